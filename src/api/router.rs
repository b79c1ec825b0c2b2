use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{account, bot, chat, health, lead, webhook};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Visitor chat
        .route("/api/v1/chat", post(chat::chat))

        // Billing
        .route("/api/v1/billing/webhook", post(webhook::billing_webhook))

        // Accounts
        .route("/api/v1/accounts/{account_id}/usage", get(account::get_usage))
        .route("/api/v1/accounts/{account_id}/plan", post(account::change_plan))
        .route("/api/v1/accounts/{account_id}/bots", post(bot::create_bot).get(bot::list_bots))
        .route("/api/v1/accounts/{account_id}/bots/count", get(bot::count_bots))
        .route("/api/v1/accounts/{account_id}/leads/count", get(lead::count_leads))

        // Bots
        .route("/api/v1/bots/{bot_id}/prompt", get(bot::get_prompt).put(bot::update_prompt))
        .route("/api/v1/bots/{bot_id}/notification-email", put(bot::update_notification_email))
        .route("/api/v1/bots/{bot_id}/leads", get(lead::list_leads))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        bot_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
