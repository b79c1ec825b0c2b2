use crate::domain::{models::account::Account, ports::AccountRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresAccountRepo {
    pool: PgPool,
}

impl PostgresAccountRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepo {
    async fn create(&self, account: &Account) -> Result<Account, AppError> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, email, plan, monthly_limit, used_this_cycle, billing_start_at, billing_end_at, subscription_status, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *"
        )
            .bind(&account.id)
            .bind(&account.email)
            .bind(&account.plan)
            .bind(account.monthly_limit)
            .bind(account.used_this_cycle)
            .bind(account.billing_start_at)
            .bind(account.billing_end_at)
            .bind(&account.subscription_status)
            .bind(account.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, AppError> {
        sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_billing(&self, account: &Account) -> Result<Account, AppError> {
        sqlx::query_as::<_, Account>(
            "UPDATE accounts SET plan=$1, monthly_limit=$2, used_this_cycle=$3, billing_start_at=$4, billing_end_at=$5, subscription_status=$6 WHERE id=$7 RETURNING *"
        )
            .bind(&account.plan)
            .bind(account.monthly_limit)
            .bind(account.used_this_cycle)
            .bind(account.billing_start_at)
            .bind(account.billing_end_at)
            .bind(&account.subscription_status)
            .bind(&account.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn increment_usage(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE accounts SET used_this_cycle = used_this_cycle + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn update_subscription_by_email(
        &self,
        email: &str,
        plan: &str,
        monthly_limit: i64,
        status: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE accounts SET plan = $1, monthly_limit = $2, subscription_status = $3 WHERE email = $4"
        )
            .bind(plan)
            .bind(monthly_limit)
            .bind(status)
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
