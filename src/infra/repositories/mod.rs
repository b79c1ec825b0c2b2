pub mod sqlite_account_repo;
pub mod sqlite_bot_repo;
pub mod sqlite_lead_repo;

pub mod postgres_account_repo;
pub mod postgres_bot_repo;
pub mod postgres_lead_repo;
