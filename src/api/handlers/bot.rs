use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{CreateBotRequest, UpdatePromptRequest, UpdateNotificationEmailRequest},
    responses::{CountResponse, PromptResponse, SuccessResponse},
};
use crate::domain::models::bot::Bot;
use crate::domain::services::validators::valid_email;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_bot(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
    Json(payload): Json<CreateBotRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Bot name required".into()));
    }

    let account = state.account_repo.find_by_id(&account_id).await?
        .ok_or(AppError::NotFound("Account not found".into()))?;

    let plan = account.plan()
        .map_err(|e| AppError::InternalWithMsg(format!("Account {} has {}", account.id, e)))?;

    let existing = state.bot_repo.count_by_account(&account.id).await?;
    if existing >= plan.limits().max_bots {
        return Err(AppError::Forbidden("Bot limit reached".into()));
    }

    let bot = Bot::new(account.id, payload.name, payload.system_prompt_locked, payload.system_prompt_custom);
    let created = state.bot_repo.create(&bot).await?;

    info!(bot_id = %created.id, account_id = %created.account_id, "Bot created");
    Ok(Json(created))
}

pub async fn list_bots(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bots = state.bot_repo.list_by_account(&account_id).await?;
    Ok(Json(bots))
}

pub async fn count_bots(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let count = state.bot_repo.count_by_account(&account_id).await?;
    Ok(Json(CountResponse { count }))
}

pub async fn get_prompt(
    State(state): State<Arc<AppState>>,
    Path(bot_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bot = state.bot_repo.find_by_id(&bot_id).await?
        .ok_or(AppError::NotFound("Bot not found".into()))?;

    Ok(Json(PromptResponse { system_prompt_custom: bot.system_prompt_custom }))
}

pub async fn update_prompt(
    State(state): State<Arc<AppState>>,
    Path(bot_id): Path<String>,
    Json(payload): Json<UpdatePromptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let prompt = payload.system_prompt_custom
        .filter(|p| !p.trim().is_empty())
        .ok_or(AppError::Validation("Prompt required".into()))?;

    state.bot_repo.update_prompt(&bot_id, &prompt).await?;
    info!(bot_id = %bot_id, "Bot prompt updated");
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn update_notification_email(
    State(state): State<Arc<AppState>>,
    Path(bot_id): Path<String>,
    Json(payload): Json<UpdateNotificationEmailRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());

    if let Some(ref address) = email
        && !valid_email(Some(address)) {
        return Err(AppError::Validation("Invalid email".into()));
    }

    state.bot_repo.update_notification_email(&bot_id, email.as_deref()).await?;
    info!(bot_id = %bot_id, enabled = email.is_some(), "Lead notification address updated");
    Ok(Json(SuccessResponse { success: true }))
}
