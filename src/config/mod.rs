//! Application configuration module
//!
//! Configuration is read from environment variables with the
//! `TRACKING_SERVICE` prefix; nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use tracking_service::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod event_bus;
mod server;
mod storage;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use event_bus::EventBusConfig;
pub use server::{Environment, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL settings, required only for the postgres backend
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub event_bus: EventBusConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// A `.env` file is read first when present.
    ///
    /// - `TRACKING_SERVICE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TRACKING_SERVICE__STORAGE__BACKEND=postgres` -> `storage.backend = Postgres`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TRACKING_SERVICE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate every section in use.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if self.storage.uses_postgres() {
            self.database.validate()?;
        }
        self.event_bus.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
