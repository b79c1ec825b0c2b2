use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Bot {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub system_prompt_locked: String,
    pub system_prompt_custom: String,
    pub notification_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Bot {
    pub fn new(account_id: String, name: String, system_prompt_locked: String, system_prompt_custom: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            name,
            system_prompt_locked,
            system_prompt_custom,
            notification_email: None,
            created_at: Utc::now(),
        }
    }

    /// Operator-locked prefix first, then the customizable suffix.
    pub fn effective_prompt(&self) -> String {
        format!("{}\n\n{}", self.system_prompt_locked, self.system_prompt_custom)
    }
}
