use crate::domain::models::{
    account::Account, bot::Bot, lead::Lead,
    dialogue::{DialogueSession, SessionKey, Slot},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, account: &Account) -> Result<Account, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, AppError>;
    async fn update_billing(&self, account: &Account) -> Result<Account, AppError>;
    /// Adds one served message to the current cycle without a read-modify-write round trip.
    async fn increment_usage(&self, id: &str) -> Result<(), AppError>;
    /// Returns the number of accounts matched by `email`.
    async fn update_subscription_by_email(
        &self,
        email: &str,
        plan: &str,
        monthly_limit: i64,
        status: &str,
    ) -> Result<u64, AppError>;
}

#[async_trait]
pub trait BotRepository: Send + Sync {
    async fn create(&self, bot: &Bot) -> Result<Bot, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Bot>, AppError>;
    async fn list_by_account(&self, account_id: &str) -> Result<Vec<Bot>, AppError>;
    async fn count_by_account(&self, account_id: &str) -> Result<i64, AppError>;
    async fn update_prompt(&self, id: &str, system_prompt_custom: &str) -> Result<(), AppError>;
    async fn update_notification_email(&self, id: &str, email: Option<&str>) -> Result<(), AppError>;
}

#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn create(&self, lead: &Lead) -> Result<Lead, AppError>;
    async fn list_by_bot(&self, bot_id: &str) -> Result<Vec<Lead>, AppError>;
    async fn count_by_account(&self, account_id: &str) -> Result<i64, AppError>;
}

#[async_trait]
pub trait LlmService: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str
    ) -> Result<String, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str, text_body: &str) -> Result<(), AppError>;
}

/// Mutation applied to a live session while its key is held exclusively.
pub type SessionMutation<'a> = Box<dyn FnOnce(&mut DialogueSession) + Send + 'a>;

/// Owns every in-progress booking dialogue.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &SessionKey) -> Option<DialogueSession>;
    /// Replaces any existing session under `key`.
    async fn create(&self, key: &SessionKey, initial: Slot) -> DialogueSession;
    /// Runs `f` atomically against the session; `false` if no live session exists.
    async fn mutate(&self, key: &SessionKey, f: SessionMutation<'_>) -> bool;
    /// Only one concurrent caller receives the removed session.
    async fn delete(&self, key: &SessionKey) -> Option<DialogueSession>;
    async fn purge_expired(&self, now: DateTime<Utc>) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Booking,
    General,
}

pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Intent;
}
