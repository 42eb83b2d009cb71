pub mod auth;
pub mod lunch;
pub mod metrics;
