//! EventSubscriber port - Interface for consuming integration events.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Handler for processing inbound events.
///
/// Implementations should be idempotent: the bus delivers at-least-once.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for subscribing handlers to routing keys.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe handler to every event published on `routing_key`.
    fn subscribe(&self, routing_key: &str, handler: Arc<dyn EventHandler>);

    /// Subscribe handler to several routing keys.
    fn subscribe_all(&self, routing_keys: &[&str], handler: Arc<dyn EventHandler>) {
        for key in routing_keys {
            self.subscribe(key, handler.clone());
        }
    }
}

/// Combined trait for event bus implementations.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that traits are object-safe
    #[allow(dead_code)]
    fn assert_handler_object_safe(_: &dyn EventHandler) {}

    #[allow(dead_code)]
    fn assert_subscriber_object_safe(_: &dyn EventSubscriber) {}

    #[allow(dead_code)]
    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn event_handler_is_send_sync() {
        #[allow(dead_code)]
        fn check<T: EventHandler>() {
            assert_send_sync::<T>();
        }
    }
}
