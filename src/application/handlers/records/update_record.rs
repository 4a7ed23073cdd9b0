//! UpdateRecordHandler - Command handler for partial record updates.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::application::EventDispatcher;
use crate::domain::foundation::{CommandMetadata, ErrorCode, ValidationError};
use crate::domain::records::{EventAction, RecordError, RecordFilter, TrackedRecord};
use crate::ports::RecordRepository;

/// Command to apply `changes` to the record `record_id` owned by `subject_id`.
#[derive(Debug, Clone)]
pub struct UpdateRecordCommand {
    pub record_id: String,
    pub subject_id: String,
    pub changes: JsonValue,
}

/// Handler for partial updates.
///
/// The patch is validated on its own first, then merged over the stored
/// record and validated again as a complete record so cross-field rules
/// (time range against duration) still hold after the merge.
pub struct UpdateRecordHandler<R: TrackedRecord> {
    repository: Arc<dyn RecordRepository<R>>,
    dispatcher: EventDispatcher,
}

impl<R: TrackedRecord> UpdateRecordHandler<R> {
    pub fn new(repository: Arc<dyn RecordRepository<R>>, dispatcher: EventDispatcher) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateRecordCommand,
        metadata: CommandMetadata,
    ) -> Result<R, RecordError> {
        let kind = R::KIND;

        // 1. Build the patch; path parameters win over the body
        let JsonValue::Object(mut changes) = cmd.changes else {
            return Err(ValidationError::invalid_format(
                "The request body is not in a format that is supported!",
                "A record object is expected.",
            )
            .into());
        };
        changes.insert("id".to_string(), JsonValue::String(cmd.record_id.clone()));
        changes.insert(
            kind.subject_field.to_string(),
            JsonValue::String(cmd.subject_id.clone()),
        );
        let patch = R::from_json(&JsonValue::Object(changes));

        if let Err(e) = patch.validate_update() {
            debug!(kind = kind.collection, error = %e, "Update rejected");
            return Err(e.into());
        }

        // 2. Load the stored record
        let filter = RecordFilter::new()
            .eq("id", cmd.record_id.as_str())
            .eq(kind.subject_field, cmd.subject_id.as_str());
        let existing = self
            .repository
            .find_one(&filter)
            .await?
            .ok_or_else(|| RecordError::not_found(kind.not_found()))?;

        // 3. Merge and re-check the whole record
        let merged = existing.merged_with(&patch);
        merged.validate_create()?;

        // 4. Persist
        let updated = match self.repository.update(&merged).await {
            Ok(Some(updated)) => updated,
            Ok(None) => return Err(RecordError::not_found(kind.not_found())),
            Err(e) if e.code == ErrorCode::Conflict => {
                return Err(RecordError::conflict(kind.already_registered))
            }
            Err(e) => return Err(e.into()),
        };

        info!(kind = kind.collection, id = %cmd.record_id, "Record updated");
        self.dispatcher.dispatch(
            updated
                .to_event(EventAction::Update)
                .with_correlation_id(metadata.correlation_id()),
        );

        Ok(updated)
    }
}
