use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::ChatRequest, responses::ChatResponse};
use crate::domain::services::chat_service::ChatTurn;
use crate::error::AppError;
use std::sync::Arc;
use tracing::Span;

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("Missing {}", field)))
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let bot_id = required(payload.bot_id, "bot_id")?;
    let session_id = required(payload.session_id, "session_id")?;
    let message = required(payload.message, "message")?;

    Span::current().record("bot_id", bot_id.as_str());

    let reply = state.chat_service.handle_turn(ChatTurn {
        bot_id: &bot_id,
        session_id: &session_id,
        message: &message,
    }).await?;

    Ok(Json(ChatResponse { reply }))
}
