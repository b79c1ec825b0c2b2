use serde::Deserialize;

/// Fields are optional so missing ones surface as a 400 with a readable message.
#[derive(Deserialize)]
pub struct ChatRequest {
    pub bot_id: Option<String>,
    pub session_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBotRequest {
    pub name: String,
    pub system_prompt_locked: String,
    #[serde(default)]
    pub system_prompt_custom: String,
}

#[derive(Deserialize)]
pub struct UpdatePromptRequest {
    pub system_prompt_custom: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateNotificationEmailRequest {
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct ChangePlanRequest {
    pub plan: String,
}
