//! Factory for creating database clients
//!
//! The backend binary goes through this instead of [`DbClient`] directly,
//! so the "which configuration source" decision sits in one place.

use crate::client::DbClient;
use crate::error::DbError;
use slotify_config::{AppConfig, DatabaseConfig};
use std::sync::Arc;
use tracing::debug;

/// Creates [`DbClient`] instances from the available configuration sources.
#[derive(Debug, Clone, Default)]
pub struct DbClientFactory;

impl DbClientFactory {
    pub fn new() -> Self {
        Self
    }

    /// Build a client from the application configuration.
    ///
    /// Fails when the `[database]` section is missing, the URL is empty or
    /// the connection cannot be established.
    pub async fn from_app_config(&self, config: &Arc<AppConfig>) -> Result<DbClient, DbError> {
        debug!("Creating database client from application configuration");

        let db_config = config
            .database
            .as_ref()
            .ok_or_else(|| DbError::ConfigError("Database configuration is missing".to_string()))?;
        self.from_db_config(db_config).await
    }

    /// Build a client from a `[database]` section.
    pub async fn from_db_config(&self, db_config: &DatabaseConfig) -> Result<DbClient, DbError> {
        DbClient::from_config(db_config).await
    }

    /// Build a client straight from a database URL.
    pub async fn from_url(&self, db_url: &str) -> Result<DbClient, DbError> {
        DbClient::from_url(db_url).await
    }
}
