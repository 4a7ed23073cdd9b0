//! Redis-backed consumer for inbound integration events.
//!
//! Subscribes to `<exchange>.<routing_key>` for every registered routing key
//! and hands each message to the handlers of that key. A message body is
//! either a full [`EventEnvelope`] as written by `RedisEventPublisher`, or a
//! bare JSON object such as `{"event_name": "LogSyncEvent", "log": [...]}`,
//! which becomes the payload of a fresh envelope.

use futures::StreamExt;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{EventHandler, EventSubscriber};

use super::redis_publisher::{bus_error, channel_name};

pub struct RedisEventConsumer {
    client: redis::Client,
    exchange: String,
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
}

impl RedisEventConsumer {
    /// Prepares a consumer for `url`. No connection is opened until [`run`].
    ///
    /// [`run`]: RedisEventConsumer::run
    pub fn new(url: &str, exchange: impl Into<String>) -> Result<Self, DomainError> {
        let client = redis::Client::open(url).map_err(bus_error)?;
        Ok(Self {
            client,
            exchange: exchange.into(),
            handlers: RwLock::new(HashMap::new()),
        })
    }

    /// Channels the consumer listens on, one per subscribed routing key.
    pub fn channels(&self) -> Vec<String> {
        let handlers = self
            .handlers
            .read()
            .expect("RedisEventConsumer: handlers lock poisoned");
        let mut channels: Vec<String> = handlers
            .keys()
            .map(|key| channel_name(&self.exchange, key))
            .collect();
        channels.sort();
        channels
    }

    /// Listens until `shutdown` flips to true or the connection drops.
    ///
    /// # Errors
    ///
    /// Returns `EventBusError` if the connection or a `SUBSCRIBE` fails.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), DomainError> {
        let channels = self.channels();
        let mut pubsub = self
            .client
            .get_async_connection()
            .await
            .map_err(bus_error)?
            .into_pubsub();
        for channel in &channels {
            pubsub
                .subscribe(channel)
                .await
                .map_err(|e| bus_error(e).with_detail("channel", channel.clone()))?;
        }
        info!(channels = ?channels, "Consuming events from Redis");

        let mut messages = Box::pin(pubsub.on_message());
        loop {
            tokio::select! {
                message = messages.next() => {
                    let Some(message) = message else {
                        warn!("Redis subscription closed");
                        return Ok(());
                    };
                    match message.get_payload::<String>() {
                        Ok(body) => self.deliver(message.get_channel_name(), &body).await,
                        Err(e) => warn!(
                            channel = message.get_channel_name(),
                            error = %e,
                            "Dropping non-text message"
                        ),
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        debug!("Redis consumer shutting down");
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Decodes one message and runs every handler of its routing key.
    /// Failures are logged; nothing is redelivered.
    pub async fn deliver(&self, channel: &str, body: &str) {
        let routing_key = routing_key_of(&self.exchange, channel);
        let event = match decode_message(routing_key, body) {
            Ok(event) => event,
            Err(e) => {
                warn!(channel, error = %e, "Dropping undecodable message");
                return;
            }
        };

        let key_handlers: Vec<Arc<dyn EventHandler>> = {
            let handlers = self
                .handlers
                .read()
                .expect("RedisEventConsumer: handlers lock poisoned");
            handlers.get(routing_key).cloned().unwrap_or_default()
        };

        for handler in key_handlers {
            if let Err(e) = handler.handle(event.clone()).await {
                warn!(
                    handler = handler.name(),
                    event_name = %event.event_name,
                    error = %e,
                    "Event handler failed"
                );
            }
        }
    }
}

impl EventSubscriber for RedisEventConsumer {
    fn subscribe(&self, routing_key: &str, handler: Arc<dyn EventHandler>) {
        let mut handlers = self
            .handlers
            .write()
            .expect("RedisEventConsumer: handlers write lock poisoned");
        handlers
            .entry(routing_key.to_string())
            .or_default()
            .push(handler);
    }
}

impl std::fmt::Debug for RedisEventConsumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisEventConsumer")
            .field("exchange", &self.exchange)
            .finish_non_exhaustive()
    }
}

fn routing_key_of<'a>(exchange: &str, channel: &'a str) -> &'a str {
    if exchange.is_empty() {
        return channel;
    }
    channel
        .strip_prefix(exchange)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(channel)
}

fn decode_message(routing_key: &str, body: &str) -> Result<EventEnvelope, DomainError> {
    let value: JsonValue = serde_json::from_str(body)
        .map_err(|e| DomainError::new(ErrorCode::ValidationFailed, e.to_string()))?;

    if !value.is_object() {
        return Err(DomainError::new(
            ErrorCode::ValidationFailed,
            "Event body is not a JSON object",
        ));
    }

    if let Ok(envelope) = serde_json::from_value::<EventEnvelope>(value.clone()) {
        return Ok(envelope);
    }

    let event_name = value
        .get("event_name")
        .and_then(JsonValue::as_str)
        .unwrap_or(routing_key)
        .to_string();
    Ok(EventEnvelope::new(event_name, routing_key, value))
}
