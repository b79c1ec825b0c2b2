use std::sync::Arc;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::models::account::{Plan, STATUS_ACTIVE, STATUS_CANCELED};
use crate::domain::ports::AccountRepository;
use crate::domain::services::signature::verify_signature;
use crate::error::AppError;

pub const EVENT_ACTIVATED: &str = "subscription.activated";
pub const EVENT_CANCELED: &str = "subscription.canceled";

/// Loosely read provider event. Only the body's JSON well-formedness is required;
/// a missing or mistyped field just makes the event one we ignore.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    pub event_type: String,
    pub data: Value,
}

impl WebhookEvent {
    pub fn from_value(body: Value) -> Self {
        let event_type = body.get("type").and_then(Value::as_str).unwrap_or_default().to_string();
        let data = body.get("data").cloned().unwrap_or(Value::Null);
        Self { event_type, data }
    }

    pub fn customer_email(&self) -> Option<&str> {
        self.data
            .pointer("/customer/email")
            .and_then(Value::as_str)
            .filter(|e| !e.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Applied { accounts: u64 },
    Ignored,
}

/// Applies payment-provider subscription events to accounts.
pub struct BillingService {
    account_repo: Arc<dyn AccountRepository>,
    secret: Option<String>,
}

impl BillingService {
    pub fn new(account_repo: Arc<dyn AccountRepository>, secret: Option<String>) -> Self {
        Self { account_repo, secret }
    }

    /// Authenticates the raw body; the body must not be interpreted before this passes.
    pub fn verify(&self, body: &[u8], signature: Option<&str>) -> Result<(), AppError> {
        let Some(secret) = self.secret.as_deref() else {
            warn!("Billing webhook received but no webhook secret is configured");
            return Err(AppError::Unauthorized);
        };
        let Some(signature) = signature else {
            warn!("Billing webhook without signature header");
            return Err(AppError::Unauthorized);
        };
        if !verify_signature(secret.as_bytes(), body, signature) {
            warn!("Billing webhook signature mismatch");
            return Err(AppError::Unauthorized);
        }
        Ok(())
    }

    pub async fn handle(&self, body: &[u8], signature: Option<&str>) -> Result<WebhookOutcome, AppError> {
        self.verify(body, signature)?;

        let body: Value = serde_json::from_slice(body)
            .map_err(|e| AppError::InternalWithMsg(format!("Unparseable webhook body: {}", e)))?;
        let event = WebhookEvent::from_value(body);

        info!(event_type = %event.event_type, "Billing event received");
        self.apply(&event).await
    }

    pub async fn apply(&self, event: &WebhookEvent) -> Result<WebhookOutcome, AppError> {
        let Some(email) = event.customer_email() else {
            info!(event_type = %event.event_type, "Billing event has no customer email, ignoring");
            return Ok(WebhookOutcome::Ignored);
        };

        let (plan, status) = match event.event_type.as_str() {
            EVENT_ACTIVATED => (Plan::PAID, STATUS_ACTIVE),
            EVENT_CANCELED => (Plan::Free, STATUS_CANCELED),
            other => {
                info!(event_type = %other, "Unhandled billing event type, ignoring");
                return Ok(WebhookOutcome::Ignored);
            }
        };

        let accounts = self.account_repo
            .update_subscription_by_email(email, plan.as_str(), plan.limits().monthly_limit, status)
            .await?;

        if accounts == 0 {
            warn!(event_type = %event.event_type, "No account matches billing customer {}", email);
        } else {
            info!(event_type = %event.event_type, plan = %plan, "Subscription updated for {}", email);
        }

        Ok(WebhookOutcome::Applied { accounts })
    }
}
