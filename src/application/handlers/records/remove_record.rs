//! RemoveRecordHandler - Command handler for deleting a record.

use std::sync::Arc;

use tracing::info;

use crate::application::EventDispatcher;
use crate::domain::foundation::CommandMetadata;
use crate::domain::records::{EventAction, RecordError, RecordFilter, TrackedRecord};
use crate::domain::validation::validate_identifier_format;
use crate::ports::RecordRepository;

/// Command to delete `record_id` owned by `subject_id`.
#[derive(Debug, Clone)]
pub struct RemoveRecordCommand {
    pub record_id: String,
    pub subject_id: String,
}

pub struct RemoveRecordHandler<R: TrackedRecord> {
    repository: Arc<dyn RecordRepository<R>>,
    dispatcher: EventDispatcher,
}

impl<R: TrackedRecord> RemoveRecordHandler<R> {
    pub fn new(repository: Arc<dyn RecordRepository<R>>, dispatcher: EventDispatcher) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    /// Returns whether a record was deleted. Deleting a record that does
    /// not exist (or belongs to another subject) is not an error.
    pub async fn handle(
        &self,
        cmd: RemoveRecordCommand,
        metadata: CommandMetadata,
    ) -> Result<bool, RecordError> {
        let kind = R::KIND;
        validate_identifier_format(&cmd.subject_id, kind.subject_field)?;
        validate_identifier_format(&cmd.record_id, kind.id_param)?;

        let filter = RecordFilter::new()
            .eq("id", cmd.record_id.as_str())
            .eq(kind.subject_field, cmd.subject_id.as_str());
        let Some(existing) = self.repository.find_one(&filter).await? else {
            return Ok(false);
        };

        if !self.repository.delete_by_id(&cmd.record_id).await? {
            return Ok(false);
        }

        info!(kind = kind.collection, id = %cmd.record_id, "Record removed");
        self.dispatcher.dispatch(
            existing
                .to_event(EventAction::Delete)
                .with_correlation_id(metadata.correlation_id()),
        );

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryEventBus, InMemoryRecordStore};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::log::{Log, LogType};

    const CHILD: &str = "5a62be07de34500146d9c544";
    const OTHER_CHILD: &str = "5a62be07d6f33400146c9b61";

    struct Fixture {
        handler: RemoveRecordHandler<Log>,
        store: InMemoryRecordStore<Log>,
        bus: Arc<InMemoryEventBus>,
        dispatcher: EventDispatcher,
        id: String,
    }

    async fn fixture() -> Fixture {
        let store = InMemoryRecordStore::<Log>::new();
        let created = store
            .create(&Log::new("2018-03-10", LogType::Steps, 1000.0, CHILD))
            .await
            .unwrap()
            .unwrap();
        let bus = Arc::new(InMemoryEventBus::new());
        let (dispatcher, _) = EventDispatcher::spawn(bus.clone());
        Fixture {
            handler: RemoveRecordHandler::new(Arc::new(store.clone()), dispatcher.clone()),
            store,
            bus,
            dispatcher,
            id: created.id().unwrap().to_string(),
        }
    }

    fn command(id: &str, subject: &str) -> RemoveRecordCommand {
        RemoveRecordCommand {
            record_id: id.to_string(),
            subject_id: subject.to_string(),
        }
    }

    #[tokio::test]
    async fn removes_record_and_publishes_delete_event() {
        let f = fixture().await;

        let removed = f
            .handler
            .handle(command(&f.id, CHILD), CommandMetadata::new())
            .await
            .unwrap();
        f.dispatcher.flush().await.unwrap();

        assert!(removed);
        assert!(f.store.is_empty().await);
        let events = f.bus.events_named("LogDeleteEvent");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].routing_key, "logs.delete");
        assert_eq!(events[0].aggregate_id.as_deref(), Some(f.id.as_str()));
    }

    #[tokio::test]
    async fn record_of_another_subject_is_left_alone() {
        let f = fixture().await;

        let removed = f
            .handler
            .handle(command(&f.id, OTHER_CHILD), CommandMetadata::new())
            .await
            .unwrap();
        f.dispatcher.flush().await.unwrap();

        assert!(!removed);
        assert_eq!(f.store.len().await, 1);
        assert_eq!(f.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn malformed_subject_is_reported_first() {
        let f = fixture().await;

        let err = f
            .handler
            .handle(command("bad", "also-bad"), CommandMetadata::new())
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidFormat);
        assert_eq!(err.message(), "Parameter {child_id} is not in valid format!");
    }
}
