//! Message bus configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Redis pub/sub settings. When disabled, events go to an in-process bus.
#[derive(Debug, Clone, Deserialize)]
pub struct EventBusConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Redis connection URL
    #[serde(default)]
    pub url: String,

    /// Prefix of every channel: `<exchange>.<routing_key>`
    #[serde(default = "default_exchange")]
    pub exchange: String,
}

impl EventBusConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.exchange.is_empty() || self.exchange.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidExchange);
        }
        if !self.enabled {
            return Ok(());
        }
        if self.url.is_empty() {
            return Err(ValidationError::MissingSetting("EVENT_BUS__URL"));
        }
        if !self.url.starts_with("redis://") && !self.url.starts_with("rediss://") {
            return Err(ValidationError::NotARedisUrl);
        }
        Ok(())
    }
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            exchange: default_exchange(),
        }
    }
}

fn default_exchange() -> String {
    "health".to_string()
}
