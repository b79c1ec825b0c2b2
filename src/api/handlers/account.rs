use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::ChangePlanRequest, responses::UsageResponse};
use crate::domain::models::account::Plan;
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub async fn get_usage(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let account = state.account_repo.find_by_id(&account_id).await?
        .ok_or(AppError::NotFound("Account not found".into()))?;

    Ok(Json(UsageResponse {
        plan: account.plan,
        used: account.used_this_cycle,
        limit: account.monthly_limit,
        billing_end_at: account.billing_end_at,
    }))
}

/// Manual plan switch; opens a fresh billing cycle with zero usage.
pub async fn change_plan(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
    Json(payload): Json<ChangePlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let plan: Plan = payload.plan.parse()
        .map_err(|_| AppError::Validation("Invalid plan".into()))?;

    let mut account = state.account_repo.find_by_id(&account_id).await?
        .ok_or(AppError::NotFound("Account not found".into()))?;

    account.change_plan(plan, Utc::now());
    let updated = state.account_repo.update_billing(&account).await?;

    info!(account_id = %updated.id, plan = %plan, "Account plan changed");
    Ok(Json(updated))
}
