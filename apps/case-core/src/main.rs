use anyhow::Context;
use axum::Router;
use case_core::{api, app, config};
use std::net::SocketAddr;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    casebook_telemetry::init();

    let (cfg, cfg_path) = config::Config::load().context("loading config/casebook.toml")?;
    info!(?cfg_path, model = ?cfg.model(), endpoint = %cfg.gateway_endpoint(), "config loaded");
    if cfg.api_key().is_none() {
        info!("no completion API key set; assistant and suggestions will be rejected upstream");
    }

    let state = app::AppState::new(cfg);
    let router: Router = api::build_router(state);

    let addr: SocketAddr = std::env::var("CASEBOOK_BIND")
        .unwrap_or_else(|_| "127.0.0.1:6071".to_string())
        .parse()
        .context("invalid CASEBOOK_BIND address")?;

    info!(%addr, version = env!("CARGO_PKG_VERSION"), "case-core listening");

    let server = axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    );

    let graceful = server.with_graceful_shutdown(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("ctrl-c received; shutting down");
    });

    if let Err(e) = graceful.await {
        error!(error = %e, "server error");
    }

    Ok(())
}
