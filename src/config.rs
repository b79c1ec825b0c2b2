use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub llm_api_url: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub billing_webhook_secret: Option<String>,
    pub clinic_timezone: String, // IANA zone preferred times are entered in
    pub session_ttl_minutes: Option<i64>,
    pub session_sweep_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            llm_api_url: env::var("LLM_API_URL").unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
            llm_api_key: env::var("LLM_API_KEY").unwrap_or_default(),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4.1-nano".to_string()),
            billing_webhook_secret: env::var("BILLING_WEBHOOK_SECRET").ok().filter(|s| !s.is_empty()),
            clinic_timezone: env::var("CLINIC_TIMEZONE").unwrap_or_else(|_| "America/New_York".to_string()),
            session_ttl_minutes: env::var("SESSION_TTL_MINUTES")
                .ok()
                .map(|v| v.parse().expect("SESSION_TTL_MINUTES must be a number")),
            session_sweep_interval_secs: env::var("SESSION_SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("SESSION_SWEEP_INTERVAL_SECS must be a number"),
        }
    }
}
