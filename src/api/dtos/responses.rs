use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

#[derive(Serialize)]
pub struct PromptResponse {
    pub system_prompt_custom: String,
}

#[derive(Serialize)]
pub struct CountResponse {
    pub count: i64,
}

#[derive(Serialize)]
pub struct UsageResponse {
    pub plan: String,
    pub used: i64,
    pub limit: i64,
    pub billing_end_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}
