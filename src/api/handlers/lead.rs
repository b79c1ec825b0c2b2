use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::responses::CountResponse;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    Path(bot_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.bot_repo.find_by_id(&bot_id).await?
        .ok_or(AppError::NotFound("Bot not found".into()))?;

    let leads = state.lead_repo.list_by_bot(&bot_id).await?;
    Ok(Json(leads))
}

pub async fn count_leads(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let count = state.lead_repo.count_by_account(&account_id).await?;
    Ok(Json(CountResponse { count }))
}
