use crate::domain::{models::lead::Lead, ports::LeadRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

pub struct PostgresLeadRepo {
    pool: PgPool,
}

impl PostgresLeadRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadRepository for PostgresLeadRepo {
    async fn create(&self, lead: &Lead) -> Result<Lead, AppError> {
        sqlx::query_as::<_, Lead>(
            "INSERT INTO leads (id, bot_id, name, phone, email, preferred_time, preferred_time_at, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *"
        )
            .bind(&lead.id)
            .bind(&lead.bot_id)
            .bind(&lead.name)
            .bind(&lead.phone)
            .bind(&lead.email)
            .bind(&lead.preferred_time)
            .bind(lead.preferred_time_at)
            .bind(lead.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Postgres Lead Insert Failed: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list_by_bot(&self, bot_id: &str) -> Result<Vec<Lead>, AppError> {
        sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads WHERE bot_id = $1 ORDER BY created_at DESC"
        )
            .bind(bot_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_account(&self, account_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM leads l JOIN bots b ON b.id = l.bot_id WHERE b.account_id = $1"
        )
            .bind(account_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
