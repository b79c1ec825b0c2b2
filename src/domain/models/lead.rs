use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Lead {
    pub id: String,
    pub bot_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub preferred_time: String,
    pub preferred_time_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

pub struct NewLeadParams {
    pub bot_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub preferred_time: String,
    pub preferred_time_at: Option<DateTime<Utc>>,
}

impl Lead {
    pub fn new(params: NewLeadParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            bot_id: params.bot_id,
            name: params.name,
            phone: params.phone,
            email: params.email,
            preferred_time: params.preferred_time,
            preferred_time_at: params.preferred_time_at,
            created_at: Utc::now(),
        }
    }
}
