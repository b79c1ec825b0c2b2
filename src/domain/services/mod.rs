pub mod billing_service;
pub mod chat_service;
pub mod dialogue_engine;
pub mod intent;
pub mod notification;
pub mod signature;
pub mod time_normalizer;
pub mod usage_gate;
pub mod validators;
