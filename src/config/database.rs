//! Postgres document store settings.
//!
//! Only read when `storage.backend = postgres`.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `postgres://` connection URL
    pub url: String,

    /// Upper bound of the shared pool used by all five record stores
    pub max_connections: u32,

    /// Seconds a request may wait for a pooled connection
    pub acquire_timeout_secs: u64,

    /// Apply `migrations/` (the records table and its unique indexes) on startup
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingSetting("DATABASE__URL"));
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::NotAPostgresUrl);
        }
        if self.max_connections == 0 {
            return Err(ValidationError::EmptyPool);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            acquire_timeout_secs: 30,
            run_migrations: true,
        }
    }
}
