use crate::domain::{models::bot::Bot, ports::BotRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresBotRepo {
    pool: PgPool,
}

impl PostgresBotRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BotRepository for PostgresBotRepo {
    async fn create(&self, bot: &Bot) -> Result<Bot, AppError> {
        sqlx::query_as::<_, Bot>(
            "INSERT INTO bots (id, account_id, name, system_prompt_locked, system_prompt_custom, notification_email, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *"
        )
            .bind(&bot.id)
            .bind(&bot.account_id)
            .bind(&bot.name)
            .bind(&bot.system_prompt_locked)
            .bind(&bot.system_prompt_custom)
            .bind(&bot.notification_email)
            .bind(bot.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Bot>, AppError> {
        sqlx::query_as::<_, Bot>(
            "SELECT * FROM bots WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_account(&self, account_id: &str) -> Result<Vec<Bot>, AppError> {
        sqlx::query_as::<_, Bot>(
            "SELECT * FROM bots WHERE account_id = $1 ORDER BY created_at DESC"
        )
            .bind(account_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_account(&self, account_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM bots WHERE account_id = $1"
        )
            .bind(account_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_prompt(&self, id: &str, system_prompt_custom: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE bots SET system_prompt_custom = $1 WHERE id = $2")
            .bind(system_prompt_custom)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Bot not found".into()));
        }
        Ok(())
    }

    async fn update_notification_email(&self, id: &str, email: Option<&str>) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE bots SET notification_email = $1 WHERE id = $2")
            .bind(email)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Bot not found".into()));
        }
        Ok(())
    }
}
