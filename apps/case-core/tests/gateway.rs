use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use case_core::config::{Config, GatewayConfig};
use case_core::{api, app};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;

mod common;

/// Scripted chat-completions backend that records every request body.
#[derive(Clone, Default)]
struct Upstream {
    seen: Arc<Mutex<Vec<Value>>>,
    script: Arc<Mutex<VecDeque<(StatusCode, Value)>>>,
}

async fn completions(State(up): State<Upstream>, Json(body): Json<Value>) -> Response {
    up.seen.lock().push(body);
    let (status, v) = up
        .script
        .lock()
        .pop_front()
        .unwrap_or((StatusCode::OK, json!({"choices": [{"message": {"role": "assistant", "content": "ok"}}]})));
    (status, Json(v)).into_response()
}

async fn spawn_upstream(script: Vec<(StatusCode, Value)>) -> (String, Upstream) {
    let up = Upstream { seen: Default::default(), script: Arc::new(Mutex::new(script.into())) };
    let router = Router::new().route("/v1/chat/completions", post(completions)).with_state(up.clone());
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap(); });
    (format!("http://{}:{}/v1/chat/completions", addr.ip(), addr.port()), up)
}

fn config_for(endpoint: &str) -> Config {
    Config {
        gateway: Some(GatewayConfig {
            endpoint: Some(endpoint.to_string()),
            model: Some("test-model".into()),
            api_key_env: Some("CASEBOOK_TEST_UNSET_KEY".into()),
        }),
        ..Default::default()
    }
}

fn final_reply(text: &str) -> (StatusCode, Value) {
    (StatusCode::OK, json!({"choices": [{"message": {"role": "assistant", "content": text}}]}))
}

#[tokio::test]
async fn copilot_injects_model_and_relays_response() {
    let (endpoint, up) = spawn_upstream(vec![
        final_reply("hello there"),
        (StatusCode::TOO_MANY_REQUESTS, json!({"error": {"message": "slow down"}})),
    ])
    .await;
    let app = api::build_router(app::AppState::new(config_for(&endpoint)));

    let (status, body) = common::json(&app, "POST", "/api/copilot", Some(json!({"messages": [{"role": "user", "content": "hi"}]}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["choices"][0]["message"]["content"], "hello there");
    assert_eq!(up.seen.lock()[0]["model"], "test-model");
    assert_eq!(up.seen.lock()[0]["messages"][0]["content"], "hi");

    // Upstream errors pass through untranslated.
    let (status, body) = common::json(&app, "POST", "/api/copilot", Some(json!({"messages": []}))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["message"], "slow down");
}

#[tokio::test]
async fn copilot_transport_failure_is_bad_gateway() {
    // Bind then drop to get a port nobody is listening on.
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let endpoint = format!("http://{}:{}/v1/chat/completions", addr.ip(), addr.port());
    let app = api::build_router(app::AppState::new(config_for(&endpoint)));

    let (status, body) = common::json(&app, "POST", "/api/copilot", Some(json!({"messages": []}))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["message"].as_str().is_some());
    assert!(casebook_telemetry::gather_prometheus()
        .contains("casebook_gateway_calls_total{outcome=\"transport_error\",purpose=\"forward\"}"));
}

#[tokio::test]
async fn suggestions_are_capped_and_scoped_to_the_case() {
    let (endpoint, up) = spawn_upstream(vec![final_reply(" thanks for your patience")]).await;
    let app = api::build_router(app::AppState::new(config_for(&endpoint)));
    common::select(&app, "00001027").await;

    let (status, body) = common::json(&app, "POST", "/api/email/suggest", Some(json!({"text": "Dear Maya,"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], " thanks for your patience");

    let seen = up.seen.lock();
    assert_eq!(seen[0]["model"], "test-model");
    assert_eq!(seen[0]["max_tokens"], 5);
    assert_eq!(seen[0]["stop"], json!(["\n", ".", ","]));
    let system = seen[0]["messages"][0]["content"].as_str().unwrap();
    assert!(system.contains("An email about this case: {"));
    assert!(system.contains("00001027"));
    assert_eq!(seen[0]["messages"][1]["content"], "Dear Maya,");
}

#[tokio::test]
async fn chat_turn_runs_operations_against_selected_case() {
    let tool_call = json!({"choices": [{"message": {
        "role": "assistant",
        "content": null,
        "tool_calls": [{
            "id": "call_1",
            "type": "function",
            "function": {"name": "updateCase", "arguments": "{\"priority\":\"Low\",\"owner\":\"u-999\"}"}
        }]
    }}]});
    let (endpoint, up) = spawn_upstream(vec![(StatusCode::OK, tool_call), final_reply("Priority lowered.")]).await;
    let app = api::build_router(app::AppState::new(config_for(&endpoint)));
    common::select(&app, "00001027").await;

    let (status, reply) = common::json(
        &app,
        "POST",
        "/api/chat/complete",
        Some(json!({"messages": [{"role": "user", "content": "Lower the priority"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply, json!({"reply": "Priority lowered.", "operations": ["updateCase"]}));

    let (_, case) = common::json(&app, "GET", "/api/selected", None).await;
    assert_eq!(case["priority"], "Low");
    assert_eq!(case["owner"]["id"], "u-100");

    let seen = up.seen.lock();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0]["tools"].as_array().unwrap().len(), 3);
    let first_system = seen[0]["messages"][0]["content"].as_str().unwrap();
    assert!(first_system.contains("Gold Tier and above"));
    assert!(first_system.contains("This is the current case: {"));
    assert!(first_system.contains("\"priority\":\"High\""));
    // Second round sees the edit and the tool result.
    let second_system = seen[1]["messages"][0]["content"].as_str().unwrap();
    assert!(second_system.contains("\"priority\":\"Low\""));
    let tool_msg = seen[1]["messages"].as_array().unwrap().iter().find(|m| m["role"] == "tool").unwrap();
    assert_eq!(tool_msg["tool_call_id"], "call_1");
    assert!(tool_msg["content"].as_str().unwrap().contains("unknown user id"));
}

#[tokio::test]
async fn chat_without_selection_offers_no_operations() {
    let (endpoint, up) = spawn_upstream(vec![final_reply("Pick a case first.")]).await;
    let app = api::build_router(app::AppState::new(config_for(&endpoint)));

    let (status, reply) = common::json(
        &app,
        "POST",
        "/api/chat/complete",
        Some(json!({"messages": [{"role": "user", "content": "Summarize"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["operations"], json!([]));
    let seen = up.seen.lock();
    assert!(seen[0].get("tools").is_none());
    assert!(seen[0]["messages"][0]["content"].as_str().unwrap().contains("No case selected"));
}

#[tokio::test]
async fn chat_loop_gives_up_after_max_steps() {
    let looping = json!({"choices": [{"message": {
        "role": "assistant",
        "tool_calls": [{"id": "c", "type": "function", "function": {"name": "logActions", "arguments": "{\"actions\":[]}"}}]
    }}]});
    let script = vec![(StatusCode::OK, looping.clone()), (StatusCode::OK, looping)];
    let (endpoint, _up) = spawn_upstream(script).await;
    let app = api::build_router(app::AppState::new(config_for(&endpoint)));
    common::select(&app, "00001028").await;

    let (status, body) = common::json(
        &app,
        "POST",
        "/api/chat/complete",
        Some(json!({"messages": [{"role": "user", "content": "loop"}], "max_steps": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["message"].as_str().unwrap().contains("tool loop exceeded"));
}
