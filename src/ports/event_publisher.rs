//! EventPublisher port - Interface for publishing integration events.
//!
//! Record handlers never call this directly on the request path; they hand
//! events to the `EventDispatcher`, which publishes in the background.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing integration events onto the message bus.
///
/// The envelope's `routing_key` selects the topic; `event_name` identifies
/// the event for consumers.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    ///
    /// # Errors
    ///
    /// Returns `EventBusError` if the bus rejects or cannot be reached.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish several events in order, stopping at the first failure.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
