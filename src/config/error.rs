//! Errors raised while loading or checking `AppConfig`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A setting that was read but cannot be used. Variants name the
/// `TRACKING_SERVICE__*` key the operator has to fix.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must be set")]
    MissingSetting(&'static str),

    #[error("SERVER__HOST/PORT do not form a socket address: {0}")]
    InvalidBindAddress(String),

    #[error("SERVER__PORT must not be 0")]
    InvalidPort,

    #[error("SERVER__REQUEST_TIMEOUT_SECS must be between 1 and 300")]
    InvalidTimeout,

    #[error("DATABASE__URL must start with postgres:// or postgresql://")]
    NotAPostgresUrl,

    #[error("DATABASE__MAX_CONNECTIONS must be greater than 0")]
    EmptyPool,

    #[error("EVENT_BUS__URL must start with redis:// or rediss://")]
    NotARedisUrl,

    #[error("EVENT_BUS__EXCHANGE must be non-empty and contain no whitespace")]
    InvalidExchange,
}
