use axum::http::StatusCode;
use case_core::{api, app, config};
use serde_json::json;

mod common;

fn router() -> axum::Router {
    api::build_router(app::AppState::new(config::Config::default()))
}

#[tokio::test]
async fn case_list_is_sorted_by_reason() {
    let app = router();
    let (status, rows) = common::json(&app, "GET", "/api/cases", None).await;
    assert_eq!(status, StatusCode::OK);
    let reasons: Vec<&str> = rows.as_array().unwrap().iter().map(|r| r["reason"].as_str().unwrap()).collect();
    assert_eq!(
        reasons,
        vec![
            "Add second delivery address",
            "Change of billing contact",
            "Invoice shows duplicate charge",
            "Late delivery on priority order",
            "Shipment arrived damaged",
            "Tracking portal down for all users",
        ]
    );
    assert!(rows.as_array().unwrap().iter().all(|r| r["selected"] == false));
}

#[tokio::test]
async fn selection_drives_context_and_rows() {
    let app = router();
    assert_eq!(common::text(&app, "/api/context").await, "No case selected");

    let case = common::select(&app, "00001029").await;
    assert_eq!(case["id"], "00001029");
    let ctx = common::text(&app, "/api/context").await;
    assert!(ctx.starts_with("This is the current case: {"));
    assert!(ctx.contains("Tracking portal down"));

    let (_, rows) = common::json(&app, "GET", "/api/cases", None).await;
    let selected: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .filter(|r| r["selected"] == true)
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(selected, vec!["00001029"]);

    // Unknown id: no case selected, not an error.
    let none = common::select(&app, "99999999").await;
    assert!(none.is_null());
    let (_, selected) = common::json(&app, "GET", "/api/selected", None).await;
    assert!(selected.is_null());
    assert_eq!(common::text(&app, "/api/context").await, "No case selected");
}

#[tokio::test]
async fn field_edits_replace_only_the_target_case() {
    let app = router();
    let (_, before) = common::json(&app, "GET", "/api/cases/00001028", None).await;

    let (status, edited) = common::json(
        &app,
        "POST",
        "/api/cases/00001030/edit",
        Some(json!({"field": "status", "value": "Escalated"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["status"], "Escalated");
    assert_eq!(edited["id"], "00001030");

    let (_, after) = common::json(&app, "GET", "/api/cases/00001028", None).await;
    assert_eq!(before, after);

    let (_, owner) = common::json(&app, "POST", "/api/cases/00001030/edit", Some(json!({"field": "owner", "value": "u-102"}))).await;
    assert_eq!(owner["owner"], json!({"id": "u-102", "name": "Sam Okafor"}));
}

#[tokio::test]
async fn unknown_owner_or_account_is_a_no_op() {
    let app = router();
    let (_, before) = common::json(&app, "GET", "/api/cases/00001027", None).await;
    let (status, same) = common::json(&app, "POST", "/api/cases/00001027/edit", Some(json!({"field": "owner", "value": "u-404"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(same, before);
    let (_, same) = common::json(&app, "POST", "/api/cases/00001027/edit", Some(json!({"field": "account", "value": "a-404"}))).await;
    assert_eq!(same, before);
}

#[tokio::test]
async fn unknown_field_names_and_values_are_rejected() {
    let app = router();
    let (status, _) = common::call(&app, "POST", "/api/cases/00001027/edit", Some(json!({"field": "severity", "value": "x"}))).await;
    assert!(status.is_client_error());
    let (status, _) = common::call(&app, "POST", "/api/cases/00001027/edit", Some(json!({"field": "priority", "value": "Urgent"}))).await;
    assert!(status.is_client_error());
    let (status, body) = common::json(&app, "POST", "/api/cases/nope/edit", Some(json!({"field": "notes", "value": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn action_log_append_and_remove() {
    let app = router();
    let (status, case) = common::json(
        &app,
        "POST",
        "/api/cases/00001029/actions",
        Some(json!({"type": "Email", "details": "Sent outage notice"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let details: Vec<&str> = case["actions"].as_array().unwrap().iter().map(|a| a["details"].as_str().unwrap()).collect();
    assert_eq!(details, vec!["Bridge call with platform team", "Post status page update", "Sent outage notice"]);

    let (status, case) = common::json(&app, "DELETE", "/api/cases/00001029/actions/1", None).await;
    assert_eq!(status, StatusCode::OK);
    let details: Vec<&str> = case["actions"].as_array().unwrap().iter().map(|a| a["details"].as_str().unwrap()).collect();
    assert_eq!(details, vec!["Bridge call with platform team", "Sent outage notice"]);

    let (status, _) = common::json(&app, "DELETE", "/api/cases/00001029/actions/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn detail_panel_draft_is_logged_and_reset() {
    let app = router();
    let (status, _) = common::json(&app, "POST", "/api/detail/log_action", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    common::select(&app, "00001028").await;
    let (status, view) = common::json(&app, "POST", "/api/detail/editing", Some(json!({"editing": true}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["editing"], true);

    let (_, view) = common::json(&app, "PUT", "/api/detail/action_draft", Some(json!({"type": "Task", "details": "pull billing export"}))).await;
    assert_eq!(view["action_draft"]["type"], "Task");

    let (status, case) = common::json(&app, "POST", "/api/detail/log_action", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(case["actions"], json!([{"type": "Task", "details": "pull billing export"}]));

    let (_, view) = common::json(&app, "GET", "/api/detail", None).await;
    assert_eq!(view["action_draft"], json!({"type": "Call", "details": ""}));
    assert_eq!(view["editing"], true);

    // Another case resets edit mode.
    common::select(&app, "00001027").await;
    let (_, view) = common::json(&app, "GET", "/api/detail", None).await;
    assert_eq!(view["editing"], false);
    assert_eq!(view["case_id"], "00001027");
}

#[tokio::test]
async fn directory_lists_users_and_accounts() {
    let app = router();
    let (_, dir) = common::json(&app, "GET", "/api/directory", None).await;
    assert_eq!(dir["users"].as_array().unwrap().len(), 3);
    let tiers: Vec<&str> = dir["accounts"].as_array().unwrap().iter().map(|a| a["tier"].as_str().unwrap()).collect();
    assert_eq!(tiers, vec!["Basic", "Silver", "Gold", "Platinum"]);
}
