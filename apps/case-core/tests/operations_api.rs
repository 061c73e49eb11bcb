use axum::http::StatusCode;
use case_core::{api, app, config};
use serde_json::json;

mod common;

fn router() -> axum::Router {
    api::build_router(app::AppState::new(config::Config::default()))
}

#[tokio::test]
async fn operations_require_a_selected_case() {
    let app = router();
    let (status, ops) = common::json(&app, "GET", "/api/operations", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ops, json!([]));

    let (status, body) = common::json(&app, "POST", "/api/operations/logActions", Some(json!({"actions": []}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "no case selected");

    common::select(&app, "00001027").await;
    let (_, ops) = common::json(&app, "GET", "/api/operations", None).await;
    let names: Vec<&str> = ops.as_array().unwrap().iter().map(|o| o["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["draftEmail", "logActions", "updateCase"]);
    let update = ops.as_array().unwrap().iter().find(|o| o["name"] == "updateCase").unwrap();
    assert!(update["parameters"]["properties"]["owner"]["description"]
        .as_str()
        .unwrap()
        .starts_with("The id of the user who owns the case. Possible users are: [{"));
}

#[tokio::test]
async fn update_case_ignores_unknown_ids_and_empty_strings() {
    let app = router();
    let before = common::select(&app, "00001027").await;
    let (status, out) = common::json(
        &app,
        "POST",
        "/api/operations/updateCase",
        Some(json!({"owner": "u-999", "account": "a-999", "phone": "", "status": "Pending"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["applied"], json!(["status"]));
    assert_eq!(out["ignored"].as_array().unwrap().len(), 2);

    let (_, after) = common::json(&app, "GET", "/api/selected", None).await;
    assert_eq!(after["owner"], before["owner"]);
    assert_eq!(after["account"], before["account"]);
    assert_eq!(after["phone"], before["phone"]);
    assert_eq!(after["status"], "Pending");
}

#[tokio::test]
async fn update_case_rejects_unknown_argument_names() {
    let app = router();
    common::select(&app, "00001027").await;
    let (status, body) = common::json(&app, "POST", "/api/operations/updateCase", Some(json!({"severity": "high"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("severity"));

    let (status, _) = common::json(&app, "POST", "/api/operations/closeCase", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn log_actions_appends_after_existing() {
    let app = router();
    common::select(&app, "00001027").await;
    let (status, out) = common::json(
        &app,
        "POST",
        "/api/operations/logActions",
        Some(json!({"actions": [
            {"type": "Call", "details": "left voicemail"},
            {"type": "Fax", "details": "not a channel"},
            {"type": "Meeting", "details": "site visit booked"}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["ignored"].as_array().unwrap().len(), 1);
    let actions = out["case"]["actions"].as_array().unwrap();
    let details: Vec<&str> = actions.iter().map(|a| a["details"].as_str().unwrap()).collect();
    assert_eq!(
        details,
        vec!["Called customer to confirm damage report", "left voicemail", "site visit booked"]
    );
}

#[tokio::test]
async fn draft_email_opens_the_overlay_without_touching_the_case() {
    let app = router();
    let before = common::select(&app, "00001028").await;
    let (status, out) = common::json(
        &app,
        "POST",
        "/api/operations/draftEmail",
        Some(json!({"subject": "Re: case", "body": "Hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let expected = json!({"receiver": "luis.ortega@brightline.example", "subject": "Re: case", "body": "Hello"});
    assert_eq!(out["email"], expected);

    let (_, detail) = common::json(&app, "GET", "/api/detail", None).await;
    assert_eq!(detail["email"], expected);
    let (_, after) = common::json(&app, "GET", "/api/selected", None).await;
    assert_eq!(after, before);
}

#[tokio::test]
async fn log_actions_tolerates_null_and_stray_entries() {
    let app = router();
    let before = common::select(&app, "00001027").await;
    let (status, out) = common::json(&app, "POST", "/api/operations/logActions", Some(json!({"actions": null}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["applied"], json!([]));
    assert_eq!(out["case"], before);

    let (status, out) = common::json(
        &app,
        "POST",
        "/api/operations/logActions",
        Some(json!({"actions": ["phone them", {"type": "Task", "details": "order replacement"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(out["applied"], json!(["Task: order replacement"]));
    assert_eq!(out["ignored"].as_array().unwrap().len(), 1);
    assert_eq!(out["case"]["actions"].as_array().unwrap().len(), before["actions"].as_array().unwrap().len() + 1);
}
