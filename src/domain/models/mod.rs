pub mod account;
pub mod bot;
pub mod dialogue;
pub mod lead;
