pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use tracing::warn;

use config::{Config, DEFAULT_ADMIN_SECRET};
use db::RecordStore;
use services::{
    auth::{Authenticator, Sha256Authenticator, SharedSecretAuthenticator},
    lunch::LunchBoard,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<LunchBoard>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RecordStore>) -> anyhow::Result<Self> {
        let auth = authenticator(&config)?;
        Ok(Self {
            board: Arc::new(LunchBoard::new(store, auth)),
            config: Arc::new(config),
        })
    }
}

/// Hashed secret when configured, plain shared secret otherwise.
pub fn authenticator(config: &Config) -> anyhow::Result<Arc<dyn Authenticator>> {
    if let Some(digest) = &config.admin_secret_sha256 {
        return Ok(Arc::new(Sha256Authenticator::from_hex(digest)?));
    }
    if config.admin_secret == DEFAULT_ADMIN_SECRET {
        warn!("ADMIN_SECRET not set, using the default admin secret");
    }
    Ok(Arc::new(SharedSecretAuthenticator::new(config.admin_secret.clone())))
}
