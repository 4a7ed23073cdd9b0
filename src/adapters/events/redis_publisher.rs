//! Redis-backed event publisher.
//!
//! Each envelope is serialized to JSON and sent with `PUBLISH` on the
//! channel `<exchange>.<routing_key>`, e.g. `health.sleep.save`.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

#[derive(Clone)]
pub struct RedisEventPublisher {
    conn: MultiplexedConnection,
    exchange: String,
}

impl RedisEventPublisher {
    pub fn new(conn: MultiplexedConnection, exchange: impl Into<String>) -> Self {
        Self {
            conn,
            exchange: exchange.into(),
        }
    }

    /// Opens a multiplexed connection to `url`.
    ///
    /// # Errors
    ///
    /// Returns `EventBusError` if the URL is invalid or the server is unreachable.
    pub async fn connect(url: &str, exchange: impl Into<String>) -> Result<Self, DomainError> {
        let client = redis::Client::open(url).map_err(bus_error)?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(bus_error)?;
        Ok(Self::new(conn, exchange))
    }

    pub fn channel_for(&self, routing_key: &str) -> String {
        channel_name(&self.exchange, routing_key)
    }
}

pub(super) fn channel_name(exchange: &str, routing_key: &str) -> String {
    if exchange.is_empty() {
        routing_key.to_string()
    } else {
        format!("{}.{}", exchange, routing_key)
    }
}

pub(super) fn bus_error(e: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::EventBusError, e.to_string())
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let channel = self.channel_for(&event.routing_key);
        let body = serde_json::to_string(&event).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, e.to_string())
                .with_detail("event_name", event.event_name.clone())
        })?;

        let mut conn = self.conn.clone();
        conn.publish::<_, _, ()>(&channel, body)
            .await
            .map_err(|e| bus_error(e).with_detail("channel", channel.clone()))?;

        Ok(())
    }
}

impl std::fmt::Debug for RedisEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisEventPublisher")
            .field("exchange", &self.exchange)
            .finish_non_exhaustive()
    }
}
