//! HTTP client for case-core. All state lives in the core; these calls either read
//! it or report one change and return the updated value.
#![cfg_attr(not(feature = "tui"), allow(dead_code))]

use casebook_types::{
    Action, Case, CaseRow, ChatMessage, ChatReply, DetailView, DirectoryView, DraftChange, Email, FieldEdit, Suggestion,
};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static BASE: Lazy<String> = Lazy::new(|| {
    std::env::var("CASEBOOK_CORE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:6071".to_string())
        .trim_end_matches('/')
        .to_string()
});
static CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

fn url(path: &str) -> String {
    format!("{}{}", BASE.as_str(), path)
}

#[derive(Deserialize)]
struct ApiError { message: String }

/// Sends the request and decodes the body, turning `{message}` error bodies into
/// readable errors.
async fn send<T: DeserializeOwned>(rb: reqwest::RequestBuilder) -> anyhow::Result<T> {
    let resp = rb.send().await?;
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        let msg = serde_json::from_str::<ApiError>(&text).map(|e| e.message).unwrap_or(text);
        anyhow::bail!("http {}: {}", status.as_u16(), msg);
    }
    Ok(resp.json::<T>().await?)
}

async fn send_empty(rb: reqwest::RequestBuilder) -> anyhow::Result<()> {
    let resp = rb.send().await?;
    if resp.status().is_success() { Ok(()) } else { anyhow::bail!("http {}", resp.status().as_u16()) }
}

#[derive(Deserialize)]
struct Health { version: String }

pub async fn health() -> anyhow::Result<String> {
    let h: Health = send(CLIENT.get(url("/health"))).await?;
    Ok(h.version)
}

pub async fn directory() -> anyhow::Result<DirectoryView> {
    send(CLIENT.get(url("/api/directory"))).await
}

pub async fn list_cases() -> anyhow::Result<Vec<CaseRow>> {
    send(CLIENT.get(url("/api/cases"))).await
}

pub async fn selected() -> anyhow::Result<Option<Case>> {
    send(CLIENT.get(url("/api/selected"))).await
}

pub async fn select(id: Option<&str>) -> anyhow::Result<Option<Case>> {
    send(CLIENT.post(url("/api/select")).json(&serde_json::json!({"id": id}))).await
}

pub async fn edit(id: &str, edit: &FieldEdit) -> anyhow::Result<Case> {
    send(CLIENT.post(url(&format!("/api/cases/{}/edit", id))).json(edit)).await
}

pub async fn remove_action(id: &str, index: usize) -> anyhow::Result<Case> {
    send(CLIENT.delete(url(&format!("/api/cases/{}/actions/{}", id, index)))).await
}

pub async fn detail() -> anyhow::Result<DetailView> {
    send(CLIENT.get(url("/api/detail"))).await
}

pub async fn set_editing(editing: bool) -> anyhow::Result<DetailView> {
    send(CLIENT.post(url("/api/detail/editing")).json(&serde_json::json!({"editing": editing}))).await
}

pub async fn set_action_draft(draft: &Action) -> anyhow::Result<DetailView> {
    send(CLIENT.put(url("/api/detail/action_draft")).json(draft)).await
}

pub async fn log_action() -> anyhow::Result<Case> {
    send(CLIENT.post(url("/api/detail/log_action"))).await
}

pub async fn email_open() -> anyhow::Result<Email> {
    send(CLIENT.post(url("/api/email/open"))).await
}

pub async fn email_change(change: &DraftChange) -> anyhow::Result<Email> {
    send(CLIENT.patch(url("/api/email")).json(change)).await
}

pub async fn email_send() -> anyhow::Result<Case> {
    send(CLIENT.post(url("/api/email/send"))).await
}

pub async fn email_cancel() -> anyhow::Result<()> {
    send_empty(CLIENT.post(url("/api/email/cancel"))).await
}

pub async fn email_suggest(text: &str) -> anyhow::Result<String> {
    let s: Suggestion = send(CLIENT.post(url("/api/email/suggest")).json(&serde_json::json!({"text": text}))).await?;
    Ok(s.text)
}

pub async fn chat_complete(messages: Vec<ChatMessage>) -> anyhow::Result<ChatReply> {
    send(CLIENT.post(url("/api/chat/complete")).json(&serde_json::json!({"messages": messages}))).await
}
