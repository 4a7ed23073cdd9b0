//! RecordSyncHandler - stores records that arrive on the message bus.
//!
//! Device integrations publish `<prefix>.sync` events whose payload carries
//! one record or an array of records under the kind's payload key. Each
//! event runs through the same batch-add protocol as HTTP input. Malformed
//! events are logged and dropped; they are never redelivered.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::foundation::{CommandMetadata, DomainError, EventEnvelope};
use crate::domain::records::TrackedRecord;
use crate::ports::EventHandler;

use super::{AddRecordsCommand, AddRecordsHandler, AddRecordsResult, RecordPayload};

pub struct RecordSyncHandler<R: TrackedRecord> {
    add_records: Arc<AddRecordsHandler<R>>,
}

impl<R: TrackedRecord> RecordSyncHandler<R> {
    pub fn new(add_records: Arc<AddRecordsHandler<R>>) -> Self {
        Self { add_records }
    }

    /// Routing key this handler should be subscribed to.
    pub fn routing_key() -> String {
        R::KIND.sync_routing_key()
    }

    fn payload_of(event: &EventEnvelope) -> Option<RecordPayload> {
        match event.payload.get(R::KIND.payload_key)? {
            JsonValue::Array(items) => Some(RecordPayload::Batch(items.clone())),
            item @ JsonValue::Object(_) => Some(RecordPayload::Single(item.clone())),
            _ => None,
        }
    }
}

#[async_trait]
impl<R: TrackedRecord> EventHandler for RecordSyncHandler<R> {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let Some(payload) = Self::payload_of(&event) else {
            warn!(
                event_name = %event.event_name,
                "Event received but could not be handled due to an error in the event format."
            );
            return Ok(());
        };

        let mut metadata = CommandMetadata::new().with_source("bus");
        if let Some(correlation_id) = &event.metadata.correlation_id {
            metadata = metadata.with_correlation_id(correlation_id.clone());
        }

        match self
            .add_records
            .handle(AddRecordsCommand::new(payload), metadata)
            .await
        {
            Ok(AddRecordsResult::Batch(status)) => info!(
                event_name = %event.event_name,
                success = status.success.len(),
                error = status.error.len(),
                "Sync event handled"
            ),
            Ok(AddRecordsResult::Single(record)) => info!(
                event_name = %event.event_name,
                id = record.id().unwrap_or_default(),
                "Sync event handled"
            ),
            Err(e) => warn!(
                event_name = %event.event_name,
                error = %e,
                description = e.description(),
                "An error occurred while handling sync event"
            ),
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "RecordSyncHandler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryEventBus, InMemoryRecordStore};
    use crate::application::EventDispatcher;
    use crate::domain::log::Log;
    use crate::ports::{EventPublisher, EventSubscriber};
    use serde_json::json;

    const CHILD: &str = "5a62be07de34500146d9c544";

    struct Fixture {
        bus: Arc<InMemoryEventBus>,
        store: InMemoryRecordStore<Log>,
    }

    fn fixture() -> Fixture {
        let bus = Arc::new(InMemoryEventBus::new());
        let store = InMemoryRecordStore::<Log>::new();
        let (dispatcher, _) = EventDispatcher::spawn(bus.clone());
        let add = Arc::new(AddRecordsHandler::new(Arc::new(store.clone()), dispatcher));
        bus.subscribe(
            &RecordSyncHandler::<Log>::routing_key(),
            Arc::new(RecordSyncHandler::new(add)),
        );
        Fixture { bus, store }
    }

    fn log(date: &str) -> JsonValue {
        json!({ "date": date, "type": "steps", "value": 1500, "child_id": CHILD })
    }

    #[tokio::test]
    async fn array_payload_is_stored() {
        let f = fixture();

        f.bus
            .publish(EventEnvelope::new(
                "LogSyncEvent",
                "logs.sync",
                json!({ "log": [log("2018-03-10"), log("2018-03-11"), { "date": "bad" }] }),
            ))
            .await
            .unwrap();

        assert_eq!(f.store.len().await, 2);
    }

    #[tokio::test]
    async fn single_payload_is_stored() {
        let f = fixture();

        f.bus
            .publish(EventEnvelope::new(
                "LogSyncEvent",
                "logs.sync",
                json!({ "log": log("2018-03-10") }),
            ))
            .await
            .unwrap();

        assert_eq!(f.store.len().await, 1);
    }

    #[tokio::test]
    async fn malformed_event_is_dropped_without_error() {
        let f = fixture();

        let result = f
            .bus
            .publish(EventEnvelope::new(
                "LogSyncEvent",
                "logs.sync",
                json!({ "sleep": [] }),
            ))
            .await;

        assert!(result.is_ok());
        assert!(f.store.is_empty().await);
    }

    #[tokio::test]
    async fn invalid_single_record_is_logged_not_propagated() {
        let f = fixture();

        let result = f
            .bus
            .publish(EventEnvelope::new(
                "LogSyncEvent",
                "logs.sync",
                json!({ "log": { "type": "steps" } }),
            ))
            .await;

        assert!(result.is_ok());
        assert!(f.store.is_empty().await);
    }
}
