pub mod ai;
pub mod email;
pub mod factory;
pub mod repositories;
pub mod session;
