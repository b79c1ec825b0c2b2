use std::sync::Arc;
use chrono::Utc;
use tracing::{error, info, instrument, warn, Span};

use crate::domain::models::dialogue::SessionKey;
use crate::domain::ports::{AccountRepository, BotRepository, Intent, IntentClassifier, LlmService};
use crate::domain::services::dialogue_engine::DialogueEngine;
use crate::domain::services::usage_gate;
use crate::error::AppError;

pub const FALLBACK_REPLY: &str = "🤖 I'm here to help you with appointments and clinic questions.";

pub struct ChatTurn<'a> {
    pub bot_id: &'a str,
    pub session_id: &'a str,
    pub message: &'a str,
}

/// Runs one visitor message through gate, dialogue, LLM fallback and metering.
pub struct ChatService {
    bot_repo: Arc<dyn BotRepository>,
    account_repo: Arc<dyn AccountRepository>,
    classifier: Arc<dyn IntentClassifier>,
    llm_service: Arc<dyn LlmService>,
    engine: DialogueEngine,
}

impl ChatService {
    pub fn new(
        bot_repo: Arc<dyn BotRepository>,
        account_repo: Arc<dyn AccountRepository>,
        classifier: Arc<dyn IntentClassifier>,
        llm_service: Arc<dyn LlmService>,
        engine: DialogueEngine,
    ) -> Self {
        Self { bot_repo, account_repo, classifier, llm_service, engine }
    }

    #[instrument(skip_all, fields(bot_id = %turn.bot_id, account_id = tracing::field::Empty))]
    pub async fn handle_turn(&self, turn: ChatTurn<'_>) -> Result<String, AppError> {
        let bot = self.bot_repo.find_by_id(turn.bot_id).await?
            .ok_or(AppError::NotFound("Bot not found".into()))?;

        let account = self.account_repo.find_by_id(&bot.account_id).await?
            .ok_or(AppError::NotFound("Account not found".into()))?;
        Span::current().record("account_id", account.id.as_str());

        usage_gate::check(&account, Utc::now())?;

        let key = SessionKey::new(&bot.id, turn.session_id);
        let text = turn.message.trim();

        let reply = match self.engine.advance(&key, &bot, text).await {
            Some(reply) => reply,
            None if self.classifier.classify(text) == Intent::Booking => self.engine.start(&key).await,
            None => {
                match self.llm_service.generate(turn.message, &bot.effective_prompt()).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        error!("LLM completion failed, serving fallback reply: {}", e);
                        FALLBACK_REPLY.to_string()
                    }
                }
            }
        };

        // served replies always count, whichever path produced them
        if let Err(e) = self.account_repo.increment_usage(&account.id).await {
            warn!("Failed to record usage for served turn: {:?}", e);
        }

        info!("Chat turn served");
        Ok(reply)
    }
}
