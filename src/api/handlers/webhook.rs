use axum::{body::Bytes, extract::State, http::HeaderMap, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::responses::WebhookAck;
use crate::error::AppError;
use std::sync::Arc;

pub const SIGNATURE_HEADER: &str = "paddle-signature";

/// Takes the body as raw bytes; the signature covers them exactly as sent.
pub async fn billing_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    state.billing_service.handle(&body, signature).await?;

    Ok(Json(WebhookAck { received: true }))
}
