//! Outbound calls to the hosted chat-completions backend.

use crate::config::Config;
use crate::email::SuggestionRequest;
use reqwest::Client as HttpClient;
use serde_json::{json, Value as JsonValue};

#[derive(Clone)]
pub struct Gateway {
    client: HttpClient,
    endpoint: String,
    model: Option<String>,
    api_key: Option<String>,
}

pub enum OnceResult {
    Final(String),
    /// Requested calls plus the raw assistant message, which must be echoed back
    /// ahead of the tool results.
    ToolCalls(Vec<ToolCall>, JsonValue),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Option<JsonValue>,
}

impl Gateway {
    pub fn new(client: HttpClient, cfg: &Config) -> Self {
        Self { client, endpoint: cfg.gateway_endpoint(), model: cfg.model(), api_key: cfg.api_key() }
    }

    pub fn model(&self) -> Option<&str> { self.model.as_deref() }

    fn with_model(&self, mut body: JsonValue) -> JsonValue {
        if let (Some(model), Some(obj)) = (&self.model, body.as_object_mut()) {
            obj.insert("model".into(), JsonValue::String(model.clone()));
        }
        body
    }

    fn post(&self, body: &JsonValue) -> reqwest::RequestBuilder {
        let req = self.client.post(&self.endpoint).header("content-type", "application/json").json(body);
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    /// Sends an opaque chat-completion body upstream with the configured model set.
    /// The caller relays status and body; only transport failures are errors.
    pub async fn forward(&self, body: JsonValue) -> Result<reqwest::Response, reqwest::Error> {
        let body = self.with_model(body);
        tracing::debug!(endpoint = %self.endpoint, model = ?self.model, "forwarding completion request");
        let sent = self.post(&body).send().await;
        record("forward", &sent);
        sent
    }

    async fn send_checked(&self, purpose: &'static str, body: JsonValue) -> anyhow::Result<JsonValue> {
        let body = self.with_model(body);
        let sent = self.post(&body).send().await;
        record(purpose, &sent);
        let resp = sent?;
        if !resp.status().is_success() {
            let status = resp.status();
            let txt = resp.text().await.unwrap_or_default();
            let snip = if txt.chars().count() > 400 { format!("{}…", txt.chars().take(400).collect::<String>()) } else { txt };
            anyhow::bail!("completion http {}: {}", status, snip);
        }
        Ok(resp.json().await?)
    }

    /// One round trip of the tool loop. `tools` is omitted when empty.
    pub async fn complete(&self, messages: &[JsonValue], tools: &[JsonValue]) -> anyhow::Result<OnceResult> {
        let mut body = json!({"messages": messages});
        if !tools.is_empty() {
            body["tools"] = json!(tools);
            body["tool_choice"] = json!("auto");
        }
        let v = self.send_checked("chat", body).await?;
        let msg = v
            .pointer("/choices/0/message")
            .cloned()
            .unwrap_or_else(|| json!({"role": "assistant", "content": ""}));
        if let Some(tc) = msg.get("tool_calls").and_then(|x| x.as_array()).filter(|a| !a.is_empty()) {
            let calls = tc
                .iter()
                .map(|c| ToolCall {
                    id: c.get("id").and_then(|s| s.as_str()).unwrap_or("").to_string(),
                    name: c.pointer("/function/name").and_then(|s| s.as_str()).unwrap_or("").to_string(),
                    arguments: c
                        .pointer("/function/arguments")
                        .and_then(|s| s.as_str())
                        .and_then(|s| serde_json::from_str::<JsonValue>(s).ok()),
                })
                .collect();
            return Ok(OnceResult::ToolCalls(calls, msg));
        }
        let reply = msg.get("content").and_then(|s| s.as_str()).unwrap_or("").to_string();
        Ok(OnceResult::Final(reply))
    }

    /// Inline continuation for the email body.
    pub async fn suggest(&self, req: &SuggestionRequest) -> anyhow::Result<String> {
        let v = self.send_checked("suggest", req.to_completion_body()).await?;
        Ok(v.pointer("/choices/0/message/content").and_then(|s| s.as_str()).unwrap_or("").to_string())
    }
}

fn record(purpose: &str, sent: &Result<reqwest::Response, reqwest::Error>) {
    match sent {
        Ok(resp) => casebook_telemetry::inc_gateway_call(purpose, resp.status().as_str()),
        Err(_) => casebook_telemetry::inc_gateway_call(purpose, "transport_error"),
    }
}
