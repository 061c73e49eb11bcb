use crate::config::Config;
use crate::gateway::Gateway;
use crate::operations::OperationRegistry;
use crate::workspace::Workspace;
use parking_lot::RwLock;
use reqwest::Client as HttpClient;
use std::sync::Arc;

pub struct AppState {
    pub version: &'static str,
    pub config: Arc<RwLock<Config>>,
    pub workspace: Arc<RwLock<Workspace>>,
    pub operations: Arc<OperationRegistry>,
    pub http: HttpClient,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// State seeded with the fixture cases.
    pub fn new(config: Config) -> SharedState {
        Self::with_workspace(config, Workspace::seeded())
    }

    pub fn with_workspace(config: Config, workspace: Workspace) -> SharedState {
        let operations = OperationRegistry::standard(workspace.directory());
        tracing::info!(cases = workspace.cases().len(), operations = ?operations.names(), "workspace ready");
        Arc::new(AppState {
            version: env!("CARGO_PKG_VERSION"),
            config: Arc::new(RwLock::new(config)),
            workspace: Arc::new(RwLock::new(workspace)),
            operations: Arc::new(operations),
            http: HttpClient::new(),
        })
    }

    /// Gateway built from the current config; the HTTP client is shared.
    pub fn gateway(&self, cfg: &Config) -> Gateway {
        Gateway::new(self.http.clone(), cfg)
    }
}
