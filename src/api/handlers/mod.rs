pub mod account;
pub mod bot;
pub mod chat;
pub mod health;
pub mod lead;
pub mod webhook;
