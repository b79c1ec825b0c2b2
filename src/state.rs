use std::sync::Arc;
use chrono::Duration;
use chrono_tz::Tz;
use crate::domain::ports::{
    AccountRepository, BotRepository, LeadRepository, EmailService, LlmService, SessionStore,
};
use crate::domain::services::{
    billing_service::BillingService,
    chat_service::ChatService,
    dialogue_engine::DialogueEngine,
    intent::KeywordIntentClassifier,
    notification::LeadNotifier,
    time_normalizer::TimeNormalizer,
};
use crate::infra::session::memory_session_store::InMemorySessionStore;
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub account_repo: Arc<dyn AccountRepository>,
    pub bot_repo: Arc<dyn BotRepository>,
    pub lead_repo: Arc<dyn LeadRepository>,
    pub session_store: Arc<dyn SessionStore>,
    pub chat_service: Arc<ChatService>,
    pub billing_service: Arc<BillingService>,
}

/// Outbound collaborators and stores the state is wired from.
pub struct StateDeps {
    pub account_repo: Arc<dyn AccountRepository>,
    pub bot_repo: Arc<dyn BotRepository>,
    pub lead_repo: Arc<dyn LeadRepository>,
    pub email_service: Arc<dyn EmailService>,
    pub llm_service: Arc<dyn LlmService>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(config: Config, timezone: Tz, deps: StateDeps) -> Self {
        let ttl = config.session_ttl_minutes.map(Duration::minutes);
        let session_store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(ttl));

        let notifier = Arc::new(LeadNotifier::new(deps.email_service, deps.templates));
        let engine = DialogueEngine::new(
            session_store.clone(),
            deps.lead_repo.clone(),
            notifier,
            TimeNormalizer::new(timezone),
        );

        let chat_service = Arc::new(ChatService::new(
            deps.bot_repo.clone(),
            deps.account_repo.clone(),
            Arc::new(KeywordIntentClassifier::default()),
            deps.llm_service,
            engine,
        ));

        let billing_service = Arc::new(BillingService::new(
            deps.account_repo.clone(),
            config.billing_webhook_secret.clone(),
        ));

        Self {
            config,
            account_repo: deps.account_repo,
            bot_repo: deps.bot_repo,
            lead_repo: deps.lead_repo,
            session_store,
            chat_service,
            billing_service,
        }
    }
}
