#![allow(dead_code)]

use leadbot_backend::{
    api::router::create_router,
    state::{AppState, StateDeps},
    config::Config,
    infra::factory::load_templates,
    infra::repositories::{
        sqlite_account_repo::SqliteAccountRepo,
        sqlite_bot_repo::SqliteBotRepo,
        sqlite_lead_repo::SqliteLeadRepo,
    },
    domain::models::{account::Account, bot::Bot, lead::Lead},
    domain::ports::{EmailService, LeadRepository, LlmService},
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::str::FromStr;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::Value;

pub const WEBHOOK_SECRET: &str = "whsec_test";
pub const LLM_REPLY: &str = "We are open Monday to Friday, 9am to 5pm.";

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

#[derive(Default)]
pub struct MockEmailService {
    pub fail: AtomicBool,
    pub attempts: AtomicUsize,
    pub sent: Mutex<Vec<SentEmail>>,
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<(), AppError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::InternalWithMsg("mail relay unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            text_body: text_body.to_string(),
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct MockLlmService {
    pub fail: AtomicBool,
    pub prompts: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str
    ) -> Result<String, AppError> {
        self.prompts.lock().unwrap().push((prompt.to_string(), system_instruction.to_string()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::InternalWithMsg("provider unavailable".to_string()));
        }
        Ok(LLM_REPLY.to_string())
    }
}

/// SQLite lead store whose writes can be switched off.
pub struct ToggleLeadRepo {
    inner: SqliteLeadRepo,
    pub fail_writes: AtomicBool,
}

#[async_trait]
impl LeadRepository for ToggleLeadRepo {
    async fn create(&self, lead: &Lead) -> Result<Lead, AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::InternalWithMsg("lead store unavailable".to_string()));
        }
        self.inner.create(lead).await
    }

    async fn list_by_bot(&self, bot_id: &str) -> Result<Vec<Lead>, AppError> {
        self.inner.list_by_bot(bot_id).await
    }

    async fn count_by_account(&self, account_id: &str) -> Result<i64, AppError> {
        self.inner.count_by_account(account_id).await
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub email: Arc<MockEmailService>,
    pub llm: Arc<MockLlmService>,
    pub leads: Arc<ToggleLeadRepo>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            llm_api_url: "http://localhost".to_string(),
            llm_api_key: "key".to_string(),
            llm_model: "test-model".to_string(),
            billing_webhook_secret: Some(WEBHOOK_SECRET.to_string()),
            clinic_timezone: "America/New_York".to_string(),
            session_ttl_minutes: None,
            session_sweep_interval_secs: 60,
        };

        let email = Arc::new(MockEmailService::default());
        let llm = Arc::new(MockLlmService::default());
        let leads = Arc::new(ToggleLeadRepo {
            inner: SqliteLeadRepo::new(pool.clone()),
            fail_writes: AtomicBool::new(false),
        });

        let state = Arc::new(AppState::new(config, chrono_tz::America::New_York, StateDeps {
            account_repo: Arc::new(SqliteAccountRepo::new(pool.clone())),
            bot_repo: Arc::new(SqliteBotRepo::new(pool.clone())),
            lead_repo: leads.clone(),
            email_service: email.clone(),
            llm_service: llm.clone(),
            templates: Arc::new(load_templates()),
        }));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            email,
            llm,
            leads,
        }
    }

    pub async fn seed_account(&self, email: &str) -> Account {
        self.state.account_repo.create(&Account::new(email.to_string())).await.unwrap()
    }

    pub async fn save_account(&self, account: &Account) -> Account {
        self.state.account_repo.update_billing(account).await.unwrap()
    }

    pub async fn account(&self, id: &str) -> Account {
        self.state.account_repo.find_by_id(id).await.unwrap().unwrap()
    }

    pub async fn seed_bot(&self, account: &Account, notification_email: Option<&str>) -> Bot {
        let bot = Bot::new(
            account.id.clone(),
            "Front Desk".to_string(),
            "You are a dental clinic assistant.".to_string(),
            "Be brief.".to_string(),
        );
        let bot = self.state.bot_repo.create(&bot).await.unwrap();
        if notification_email.is_some() {
            self.state.bot_repo.update_notification_email(&bot.id, notification_email).await.unwrap();
        }
        self.state.bot_repo.find_by_id(&bot.id).await.unwrap().unwrap()
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        let body = match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        };
        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn chat(&self, bot_id: &str, session_id: &str, message: &str) -> Response {
        self.request("POST", "/api/v1/chat", Some(serde_json::json!({
            "bot_id": bot_id,
            "session_id": session_id,
            "message": message,
        }))).await
    }

    pub async fn webhook(&self, body: &str, signature: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/v1/billing/webhook")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(sig) = signature {
            builder = builder.header("paddle-signature", sig);
        }
        self.router.clone().oneshot(builder.body(Body::from(body.to_string())).unwrap()).await.unwrap()
    }
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
