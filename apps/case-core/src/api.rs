use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::app::SharedState;
use crate::operations::OperationError;
use crate::workspace::WorkspaceError;
use casebook_telemetry as telemetry;
use casebook_types::{Action, ChatMessage, DraftChange, Email, FieldEdit, Suggestion};

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ApiError { message: String }

fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiError { message: message.into() })).into_response()
}

fn workspace_error(e: WorkspaceError) -> Response {
    let status = match e {
        WorkspaceError::CaseNotFound(_) | WorkspaceError::ActionNotFound { .. } => StatusCode::NOT_FOUND,
        WorkspaceError::NoCaseSelected | WorkspaceError::EmailClosed => StatusCode::CONFLICT,
    };
    api_error(status, e.to_string())
}

fn operation_error(e: OperationError) -> Response {
    match e {
        OperationError::Workspace(e) => workspace_error(e),
        other => api_error(StatusCode::BAD_REQUEST, other.to_string()),
    }
}

fn reply<T: Serialize>(result: Result<T, WorkspaceError>) -> Response {
    match result {
        Ok(v) => Json(v).into_response(),
        Err(e) => workspace_error(e),
    }
}

/// Browser clients on localhost may call the API directly.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|o| o.starts_with("http://localhost:") || o.starts_with("http://127.0.0.1:"))
                .unwrap_or(false)
        }))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics))
        // case collection
        .route("/api/directory", get(directory))
        .route("/api/cases", get(list_cases))
        .route("/api/cases/:id", get(get_case))
        .route("/api/cases/:id/edit", post(edit_case))
        .route("/api/cases/:id/actions", post(append_action))
        .route("/api/cases/:id/actions/:index", delete(remove_action))
        .route("/api/select", post(select_case))
        .route("/api/selected", get(selected_case))
        .route("/api/context", get(context))
        // detail panel
        .route("/api/detail", get(detail))
        .route("/api/detail/editing", post(set_editing))
        .route("/api/detail/action_draft", put(set_action_draft))
        .route("/api/detail/log_action", post(log_action_draft))
        // email overlay
        .route("/api/email/open", post(open_email))
        .route("/api/email", put(replace_email).patch(change_email))
        .route("/api/email/send", post(send_email))
        .route("/api/email/cancel", post(cancel_email))
        .route("/api/email/suggest", post(suggest_email))
        // assistant
        .route("/api/operations", get(list_operations))
        .route("/api/operations/:name", post(invoke_operation))
        .route("/api/chat/complete", post(chat_complete))
        .route("/api/copilot", post(copilot))
        .layer(cors())
        .with_state(state)
}

async fn health(State(state): State<SharedState>) -> impl IntoResponse {
    telemetry::inc_api_request("/health");
    Json(Health { status: "ok", version: state.version })
}

async fn ready() -> impl IntoResponse {
    telemetry::inc_api_request("/ready");
    StatusCode::OK
}

async fn metrics() -> impl IntoResponse {
    telemetry::inc_api_request("/metrics");
    ([("Content-Type", "text/plain; version=0.0.4")], telemetry::gather_prometheus())
}

// ---- cases ----

async fn directory(State(state): State<SharedState>) -> impl IntoResponse {
    telemetry::inc_api_request("/api/directory");
    Json(state.workspace.read().directory().view())
}

async fn list_cases(State(state): State<SharedState>) -> impl IntoResponse {
    telemetry::inc_api_request("/api/cases");
    Json(state.workspace.read().rows())
}

async fn get_case(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    telemetry::inc_api_request("/api/cases/:id");
    reply(state.workspace.read().case(&id).cloned())
}

async fn edit_case(State(state): State<SharedState>, Path(id): Path<String>, Json(edit): Json<FieldEdit>) -> Response {
    telemetry::inc_api_request("/api/cases/:id/edit");
    reply(state.workspace.write().edit_field(&id, edit))
}

async fn append_action(State(state): State<SharedState>, Path(id): Path<String>, Json(action): Json<Action>) -> Response {
    telemetry::inc_api_request("/api/cases/:id/actions");
    reply(state.workspace.write().append_action(&id, action))
}

async fn remove_action(State(state): State<SharedState>, Path((id, index)): Path<(String, usize)>) -> Response {
    telemetry::inc_api_request("/api/cases/:id/actions/:index");
    reply(state.workspace.write().remove_action(&id, index))
}

#[derive(Deserialize)]
struct SelectReq { id: Option<String> }

async fn select_case(State(state): State<SharedState>, Json(req): Json<SelectReq>) -> impl IntoResponse {
    telemetry::inc_api_request("/api/select");
    Json(state.workspace.write().select(req.id.as_deref()))
}

async fn selected_case(State(state): State<SharedState>) -> impl IntoResponse {
    telemetry::inc_api_request("/api/selected");
    Json(state.workspace.read().selected().cloned())
}

async fn context(State(state): State<SharedState>) -> impl IntoResponse {
    telemetry::inc_api_request("/api/context");
    state.workspace.read().context()
}

// ---- detail panel ----

async fn detail(State(state): State<SharedState>) -> impl IntoResponse {
    telemetry::inc_api_request("/api/detail");
    Json(state.workspace.read().detail_view())
}

#[derive(Deserialize)]
struct EditingReq { editing: bool }

async fn set_editing(State(state): State<SharedState>, Json(req): Json<EditingReq>) -> Response {
    telemetry::inc_api_request("/api/detail/editing");
    reply(state.workspace.write().set_editing(req.editing))
}

async fn set_action_draft(State(state): State<SharedState>, Json(draft): Json<Action>) -> Response {
    telemetry::inc_api_request("/api/detail/action_draft");
    reply(state.workspace.write().set_action_draft(draft))
}

async fn log_action_draft(State(state): State<SharedState>) -> Response {
    telemetry::inc_api_request("/api/detail/log_action");
    reply(state.workspace.write().log_action_draft())
}

// ---- email overlay ----

async fn open_email(State(state): State<SharedState>) -> Response {
    telemetry::inc_api_request("/api/email/open");
    reply(state.workspace.write().open_email())
}

async fn replace_email(State(state): State<SharedState>, Json(draft): Json<Email>) -> Response {
    telemetry::inc_api_request("/api/email");
    reply(state.workspace.write().update_email(draft))
}

async fn change_email(State(state): State<SharedState>, Json(change): Json<DraftChange>) -> Response {
    telemetry::inc_api_request("/api/email");
    reply(state.workspace.write().change_email(change))
}

async fn send_email(State(state): State<SharedState>) -> Response {
    telemetry::inc_api_request("/api/email/send");
    reply(state.workspace.write().send_email())
}

async fn cancel_email(State(state): State<SharedState>) -> Response {
    telemetry::inc_api_request("/api/email/cancel");
    match state.workspace.write().cancel_email() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => workspace_error(e),
    }
}

#[derive(Deserialize)]
struct SuggestReq { text: String }

async fn suggest_email(State(state): State<SharedState>, Json(req): Json<SuggestReq>) -> Response {
    telemetry::inc_api_request("/api/email/suggest");
    let (gateway, request) = {
        let cfg = state.config.read();
        let ws = state.workspace.read();
        match ws.suggestion_request(&req.text, cfg.suggestion_max_tokens(), cfg.suggestion_stop()) {
            Ok(r) => (state.gateway(&cfg), r),
            Err(e) => return workspace_error(e),
        }
    };
    match gateway.suggest(&request).await {
        Ok(text) => Json(Suggestion { text }).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "email suggestion failed");
            api_error(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

// ---- assistant ----

async fn list_operations(State(state): State<SharedState>) -> impl IntoResponse {
    telemetry::inc_api_request("/api/operations");
    if state.workspace.read().selected().is_none() {
        return Json(JsonValue::Array(vec![]));
    }
    Json(serde_json::to_value(state.operations.list()).unwrap_or_default())
}

async fn invoke_operation(State(state): State<SharedState>, Path(name): Path<String>, body: Bytes) -> Response {
    telemetry::inc_api_request("/api/operations/:name");
    let args: JsonValue = if body.is_empty() {
        JsonValue::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(e) => return api_error(StatusCode::BAD_REQUEST, format!("invalid JSON arguments: {}", e)),
        }
    };
    let result = {
        let mut ws = state.workspace.write();
        state.operations.invoke(&mut ws, &name, args)
    };
    match result {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => operation_error(e),
    }
}

#[derive(Deserialize)]
struct ChatReq {
    messages: Vec<ChatMessage>,
    max_steps: Option<usize>,
}

async fn chat_complete(State(state): State<SharedState>, Json(req): Json<ChatReq>) -> Response {
    telemetry::inc_api_request("/api/chat/complete");
    match crate::assistant::chat_turn(&state, req.messages, req.max_steps).await {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "chat_complete: completion/operation loop failed");
            api_error(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

/// Opaque pass-through: the configured model is set, everything else (status,
/// content type, body) is relayed as the backend sent it.
async fn copilot(State(state): State<SharedState>, Json(body): Json<JsonValue>) -> Response {
    telemetry::inc_api_request("/api/copilot");
    let gateway = state.gateway(&state.config.read());
    let upstream = match gateway.forward(body).await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "copilot: upstream transport failure");
            return api_error(StatusCode::BAD_GATEWAY, e.to_string());
        }
    };
    let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream.headers().get(reqwest::header::CONTENT_TYPE).and_then(|v| v.to_str().ok()).map(str::to_string);
    let mut resp = Response::builder().status(status);
    if let Some(ct) = content_type {
        resp = resp.header(header::CONTENT_TYPE, ct);
    }
    resp.body(Body::from_stream(upstream.bytes_stream()))
        .unwrap_or_else(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
