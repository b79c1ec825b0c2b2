use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::domain::models::account::{Account, Plan};
use crate::error::AppError;

/// Decides whether an account may be served another chat turn.
///
/// Runs before any dialogue or LLM work. The counter is bumped separately once the reply
/// exists, so two concurrent turns can both pass at `limit - 1`; the quota is a soft cap.
pub fn check(account: &Account, now: DateTime<Utc>) -> Result<Plan, AppError> {
    let plan = account.plan().map_err(|e| {
        error!(account_id = %account.id, "Account has misconfigured plan: {}", e);
        AppError::InternalWithMsg(format!("Account {} has {}", account.id, e))
    })?;

    if now > account.billing_end_at {
        info!(account_id = %account.id, billing_end_at = %account.billing_end_at, "Rejecting turn: subscription expired");
        return Err(AppError::SubscriptionExpired);
    }

    if account.used_this_cycle >= account.monthly_limit {
        info!(
            account_id = %account.id,
            used = account.used_this_cycle,
            limit = account.monthly_limit,
            "Rejecting turn: quota exhausted"
        );
        return Err(AppError::QuotaExceeded);
    }

    Ok(plan)
}
