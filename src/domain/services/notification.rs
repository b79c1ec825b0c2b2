use std::sync::Arc;
use serde_json::json;
use tera::{Context, Tera};
use tracing::{error, info};

use crate::domain::models::lead::Lead;
use crate::domain::ports::EmailService;
use crate::error::AppError;

pub const LEAD_HTML_TEMPLATE: &str = "lead_notification.html";
pub const LEAD_TEXT_TEMPLATE: &str = "lead_notification.txt";
pub const LEAD_SUBJECT: &str = "New Appointment Request";

/// Tells a clinic about a freshly captured lead.
pub struct LeadNotifier {
    email_service: Arc<dyn EmailService>,
    templates: Arc<Tera>,
}

impl LeadNotifier {
    pub fn new(email_service: Arc<dyn EmailService>, templates: Arc<Tera>) -> Self {
        Self { email_service, templates }
    }

    pub fn render(&self, lead: &Lead) -> Result<(String, String), AppError> {
        let context = Context::from_value(json!({
            "name": lead.name,
            "phone": lead.phone,
            "email": lead.email.as_deref().unwrap_or("Not provided"),
            "preferred_time": lead.preferred_time,
        }))
        .map_err(|_| AppError::Internal)?;

        let html = self.templates.render(LEAD_HTML_TEMPLATE, &context).map_err(|e| {
            error!("Lead template render failed: {:?}", e);
            AppError::InternalWithMsg(format!("Template error: {}", e))
        })?;
        let text = self.templates.render(LEAD_TEXT_TEMPLATE, &context).map_err(|e| {
            error!("Lead text template render failed: {:?}", e);
            AppError::InternalWithMsg(format!("Template error: {}", e))
        })?;

        Ok((html, text))
    }

    pub async fn notify(&self, recipient: &str, lead: &Lead) -> Result<(), AppError> {
        let (html, text) = self.render(lead)?;
        self.email_service.send(recipient, LEAD_SUBJECT, &html, &text).await?;
        info!(lead_id = %lead.id, "Lead notification sent to {}", recipient);
        Ok(())
    }
}
