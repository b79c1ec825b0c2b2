use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use chrono_tz::Tz;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::state::{AppState, StateDeps};
use crate::domain::services::notification::{LEAD_HTML_TEMPLATE, LEAD_TEXT_TEMPLATE};
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::ai::openai_service::OpenAiService;
use crate::infra::repositories::{
    postgres_account_repo::PostgresAccountRepo, postgres_bot_repo::PostgresBotRepo,
    postgres_lead_repo::PostgresLeadRepo,
    sqlite_account_repo::SqliteAccountRepo, sqlite_bot_repo::SqliteBotRepo,
    sqlite_lead_repo::SqliteLeadRepo,
};

pub fn load_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template(LEAD_HTML_TEMPLATE, include_str!("../../templates/lead_notification.html"))
        .expect("Failed to load lead notification template");
    tera.add_raw_template(LEAD_TEXT_TEMPLATE, include_str!("../../templates/lead_notification.txt"))
        .expect("Failed to load lead notification text template");
    tera
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));

    let llm_service = Arc::new(OpenAiService::new(
        config.llm_api_url.clone(),
        config.llm_api_key.clone(),
        config.llm_model.clone(),
    ));

    let templates = Arc::new(load_templates());

    let timezone: Tz = config.clinic_timezone.parse()
        .expect("CLINIC_TIMEZONE must be an IANA timezone name");

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState::new(config.clone(), timezone, StateDeps {
            account_repo: Arc::new(PostgresAccountRepo::new(pool.clone())),
            bot_repo: Arc::new(PostgresBotRepo::new(pool.clone())),
            lead_repo: Arc::new(PostgresLeadRepo::new(pool.clone())),
            email_service,
            llm_service,
            templates,
        })
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState::new(config.clone(), timezone, StateDeps {
            account_repo: Arc::new(SqliteAccountRepo::new(pool.clone())),
            bot_repo: Arc::new(SqliteBotRepo::new(pool.clone())),
            lead_repo: Arc::new(SqliteLeadRepo::new(pool.clone())),
            email_service,
            llm_service,
            templates,
        })
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
