use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

pub const DEFAULT_GATEWAY_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CasebookConfig {
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Chat-completions URL of the hosted backend.
    pub endpoint: Option<String>,
    /// Model identifier injected into every forwarded request. OPENAI_MODEL wins.
    pub model: Option<String>,
    /// Env var holding the bearer key (default OPENAI_API_KEY)
    pub api_key_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssistantConfig {
    /// Replaces the built-in business instructions when set.
    pub instructions: Option<String>,
    #[serde(default)]
    pub max_steps: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SuggestionsConfig {
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub stop: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub casebook: Option<CasebookConfig>,
    pub gateway: Option<GatewayConfig>,
    pub assistant: Option<AssistantConfig>,
    pub suggestions: Option<SuggestionsConfig>,
}

impl Config {
    /// Reads `config/casebook.toml` (or `CASEBOOK_CONFIG`). A missing file is not an
    /// error; a malformed one is.
    pub fn load() -> anyhow::Result<(Self, PathBuf)> {
        let cfg_path = env::var("CASEBOOK_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/casebook.toml"));
        let mut cfg: Config = if cfg_path.exists() {
            let text = fs::read_to_string(&cfg_path)?;
            toml::from_str(&text)?
        } else {
            Config::default()
        };

        // Env overrides: OPENAI_MODEL, CASEBOOK_GATEWAY_URL
        if let Ok(model) = env::var("OPENAI_MODEL") {
            if !model.is_empty() {
                cfg.gateway.get_or_insert_with(GatewayConfig::default).model = Some(model);
            }
        }
        if let Ok(url) = env::var("CASEBOOK_GATEWAY_URL") {
            cfg.gateway.get_or_insert_with(GatewayConfig::default).endpoint = Some(url);
        }

        Ok((cfg, cfg_path))
    }

    pub fn gateway_endpoint(&self) -> String {
        self.gateway
            .as_ref()
            .and_then(|g| g.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_GATEWAY_ENDPOINT.to_string())
    }

    pub fn model(&self) -> Option<String> {
        self.gateway.as_ref().and_then(|g| g.model.clone())
    }

    pub fn api_key(&self) -> Option<String> {
        let var = self
            .gateway
            .as_ref()
            .and_then(|g| g.api_key_env.clone())
            .unwrap_or_else(|| "OPENAI_API_KEY".to_string());
        env::var(var).ok().filter(|k| !k.is_empty())
    }

    pub fn instructions(&self) -> String {
        self.assistant
            .as_ref()
            .and_then(|a| a.instructions.clone())
            .unwrap_or_else(|| crate::prompt::INSTRUCTIONS.to_string())
    }

    pub fn max_steps(&self) -> usize {
        self.assistant.as_ref().and_then(|a| a.max_steps).unwrap_or(6)
    }

    pub fn suggestion_max_tokens(&self) -> u32 {
        self.suggestions.as_ref().and_then(|s| s.max_tokens).unwrap_or(5)
    }

    pub fn suggestion_stop(&self) -> Vec<String> {
        self.suggestions
            .as_ref()
            .and_then(|s| s.stop.clone())
            .unwrap_or_else(|| vec!["\n".into(), ".".into(), ",".into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_and_falls_back_to_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [gateway]
            endpoint = "http://127.0.0.1:9999/v1/chat/completions"
            model = "gpt-4o-mini"

            [suggestions]
            max_tokens = 8
            "#,
        )
        .unwrap();
        assert_eq!(cfg.gateway_endpoint(), "http://127.0.0.1:9999/v1/chat/completions");
        assert_eq!(cfg.model().as_deref(), Some("gpt-4o-mini"));
        assert_eq!(cfg.suggestion_max_tokens(), 8);
        assert_eq!(cfg.suggestion_stop(), vec!["\n", ".", ","]);
        assert_eq!(cfg.max_steps(), 6);

        let empty = Config::default();
        assert_eq!(empty.gateway_endpoint(), DEFAULT_GATEWAY_ENDPOINT);
        assert!(empty.model().is_none());
        assert!(empty.instructions().contains("case management application"));
    }
}
