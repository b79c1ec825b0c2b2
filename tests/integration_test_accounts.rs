mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bot_creation_respects_plan_limit() {
    let app = TestApp::new().await;
    let account = app.seed_account("owner@clinic.test").await;
    let uri = format!("/api/v1/accounts/{}/bots", account.id);
    let payload = json!({
        "name": "Reception",
        "system_prompt_locked": "You are a clinic assistant."
    });

    let response = app.request("POST", &uri, Some(payload.clone())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bot = parse_body(response).await;
    assert_eq!(bot["name"], "Reception");
    assert_eq!(bot["system_prompt_custom"], "");

    let response = app.request("POST", &uri, Some(payload.clone())).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(parse_body(response).await["error"], "Bot limit reached");

    let response = app.request("POST", &format!("/api/v1/accounts/{}/plan", account.id), Some(json!({ "plan": "pro" }))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request("POST", &uri, Some(payload)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request("GET", &format!("{}/count", uri), None).await;
    assert_eq!(parse_body(response).await["count"], 2);

    let response = app.request("GET", &uri, None).await;
    assert_eq!(parse_body(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_bot_creation_for_unknown_account() {
    let app = TestApp::new().await;
    let response = app.request("POST", "/api/v1/accounts/missing/bots", Some(json!({
        "name": "Reception",
        "system_prompt_locked": "x"
    }))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_plan_change_resets_cycle() {
    let app = TestApp::new().await;
    let mut account = app.seed_account("owner@clinic.test").await;
    account.used_this_cycle = 25;
    account.billing_end_at = Utc::now() - Duration::days(2);
    app.save_account(&account).await;

    let before = Utc::now();
    let response = app.request("POST", &format!("/api/v1/accounts/{}/plan", account.id), Some(json!({ "plan": "starter" }))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request("GET", &format!("/api/v1/accounts/{}/usage", account.id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let usage = parse_body(response).await;
    assert_eq!(usage["plan"], "starter");
    assert_eq!(usage["used"], 0);
    assert_eq!(usage["limit"], 3000);

    let end: DateTime<Utc> = usage["billing_end_at"].as_str().unwrap().parse().unwrap();
    assert!(end >= before + Duration::days(30) - Duration::seconds(1));

    let response = app.request("POST", &format!("/api/v1/accounts/{}/plan", account.id), Some(json!({ "plan": "enterprise" }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.request("GET", "/api/v1/accounts/missing/usage", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_prompt_management() {
    let app = TestApp::new().await;
    let account = app.seed_account("owner@clinic.test").await;
    let bot = app.seed_bot(&account, None).await;
    let uri = format!("/api/v1/bots/{}/prompt", bot.id);

    let response = app.request("GET", &uri, None).await;
    assert_eq!(parse_body(response).await["system_prompt_custom"], "Be brief.");

    let response = app.request("PUT", &uri, Some(json!({ "system_prompt_custom": "Answer in Spanish." }))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = app.state.bot_repo.find_by_id(&bot.id).await.unwrap().unwrap();
    assert_eq!(stored.effective_prompt(), "You are a dental clinic assistant.\n\nAnswer in Spanish.");

    let response = app.request("PUT", &uri, Some(json!({ "system_prompt_custom": "  " }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.request("GET", "/api/v1/bots/missing/prompt", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.request("PUT", "/api/v1/bots/missing/prompt", Some(json!({ "system_prompt_custom": "x" }))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notification_email_management() {
    let app = TestApp::new().await;
    let account = app.seed_account("owner@clinic.test").await;
    let bot = app.seed_bot(&account, None).await;
    let uri = format!("/api/v1/bots/{}/notification-email", bot.id);

    let response = app.request("PUT", &uri, Some(json!({ "email": "desk@clinic.test" }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stored = app.state.bot_repo.find_by_id(&bot.id).await.unwrap().unwrap();
    assert_eq!(stored.notification_email.as_deref(), Some("desk@clinic.test"));

    let response = app.request("PUT", &uri, Some(json!({ "email": "nope" }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.request("PUT", &uri, Some(json!({ "email": null }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stored = app.state.bot_repo.find_by_id(&bot.id).await.unwrap().unwrap();
    assert_eq!(stored.notification_email, None);
}

#[tokio::test]
async fn test_lead_listing_and_count() {
    let app = TestApp::new().await;
    let mut account = app.seed_account("owner@clinic.test").await;
    account.change_plan(leadbot_backend::domain::models::account::Plan::Pro, Utc::now());
    app.save_account(&account).await;
    let first = app.seed_bot(&account, None).await;
    let second = app.seed_bot(&account, None).await;

    for (bot_id, visitor) in [(&first.id, "a"), (&first.id, "b"), (&second.id, "c")] {
        for message in ["book an appointment", "Jane Doe", "5551234567", "skip", "2026-03-02 at 09:00"] {
            let response = app.chat(bot_id, visitor, message).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    let response = app.request("GET", &format!("/api/v1/bots/{}/leads", first.id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let leads = parse_body(response).await;
    assert_eq!(leads.as_array().unwrap().len(), 2);
    assert!(leads[0]["email"].is_null());

    let response = app.request("GET", &format!("/api/v1/accounts/{}/leads/count", account.id), None).await;
    assert_eq!(parse_body(response).await["count"], 3);

    let response = app.request("GET", "/api/v1/bots/missing/leads", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
