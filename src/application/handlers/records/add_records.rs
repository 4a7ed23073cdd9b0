//! AddRecordsHandler - the MultiStatus batch-add engine.
//!
//! Accepts one record or an array of records. Each item is validated, checked
//! for duplicates, stored and announced independently of its siblings; a
//! failure never aborts the rest of the batch. Batch results keep input order
//! inside both outcome lists.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::application::EventDispatcher;
use crate::domain::foundation::{CommandMetadata, ErrorCode, ValidationError};
use crate::domain::records::{
    DuplicatePolicy, EventAction, MultiStatus, RecordError, RecordFilter, TrackedRecord,
};
use crate::ports::RecordRepository;

/// Client input, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordPayload {
    Single(JsonValue),
    Batch(Vec<JsonValue>),
}

impl RecordPayload {
    /// Objects become `Single`, arrays `Batch`; anything else is rejected.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidFormat` validation error for scalars and `null`.
    pub fn from_json(body: JsonValue) -> Result<Self, RecordError> {
        match body {
            JsonValue::Array(items) => Ok(RecordPayload::Batch(items)),
            JsonValue::Object(_) => Ok(RecordPayload::Single(body)),
            _ => Err(ValidationError::invalid_format(
                "The request body is not in a format that is supported!",
                "A record object or an array of record objects is expected.",
            )
            .into()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RecordPayload::Single(_) => 1,
            RecordPayload::Batch(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Command to add one or more records.
#[derive(Debug, Clone)]
pub struct AddRecordsCommand {
    pub payload: RecordPayload,
    /// Overrides each item's subject field when set (the path parameter).
    pub subject_id: Option<String>,
}

impl AddRecordsCommand {
    pub fn new(payload: RecordPayload) -> Self {
        Self {
            payload,
            subject_id: None,
        }
    }

    pub fn for_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }
}

/// Single input yields the bare record; batch input yields the envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum AddRecordsResult<R> {
    Single(R),
    Batch(MultiStatus<R>),
}

/// Handler running the batch-add protocol for one record kind.
pub struct AddRecordsHandler<R: TrackedRecord> {
    repository: Arc<dyn RecordRepository<R>>,
    dispatcher: EventDispatcher,
}

impl<R: TrackedRecord> AddRecordsHandler<R> {
    pub fn new(repository: Arc<dyn RecordRepository<R>>, dispatcher: EventDispatcher) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    /// Runs the protocol.
    ///
    /// # Errors
    ///
    /// Only single-item input fails; batch input always returns the envelope.
    pub async fn handle(
        &self,
        cmd: AddRecordsCommand,
        metadata: CommandMetadata,
    ) -> Result<AddRecordsResult<R>, RecordError> {
        let correlation_id = metadata.correlation_id();
        let subject_id = cmd.subject_id.as_deref();

        match cmd.payload {
            RecordPayload::Single(raw) => self
                .add_one(&raw, subject_id, &correlation_id)
                .await
                .map(AddRecordsResult::Single),
            RecordPayload::Batch(items) => {
                let mut status = MultiStatus::new();
                for raw in items {
                    match self.add_one(&raw, subject_id, &correlation_id).await {
                        Ok(record) => status.push_success(201, record),
                        Err(e) => status.push_error(&e, raw),
                    }
                }

                info!(
                    kind = R::KIND.collection,
                    success = status.success.len(),
                    error = status.error.len(),
                    "Batch processed"
                );
                Ok(AddRecordsResult::Batch(status))
            }
        }
    }

    async fn add_one(
        &self,
        raw: &JsonValue,
        subject_id: Option<&str>,
        correlation_id: &str,
    ) -> Result<R, RecordError> {
        let kind = R::KIND;

        // 1. Decode and validate before touching storage
        let mut record = R::from_json(&without_client_id(raw));
        if let Some(subject_id) = subject_id {
            record.set_subject_id(subject_id.to_string());
        }
        if let Err(e) = record.validate_create() {
            debug!(kind = kind.collection, error = %e, "Record rejected");
            return Err(e.into());
        }

        // 2. Duplicate check
        let filter = record.uniqueness_filter();
        if self.repository.exists(&filter).await? {
            return match R::duplicate_policy() {
                DuplicatePolicy::Reject => Err(RecordError::conflict(kind.already_registered)),
                DuplicatePolicy::Replace => self.replace(record, &filter, correlation_id).await,
            };
        }

        // 3. Persist
        let created = match self.repository.create(&record).await {
            Ok(Some(created)) => created,
            Ok(None) => return Err(RecordError::missing_create_result(kind.label)),
            Err(e) if e.code == ErrorCode::Conflict => {
                return Err(RecordError::conflict(kind.already_registered))
            }
            Err(e) => return Err(e.into()),
        };

        // 4. Announce
        info!(kind = kind.collection, id = created.id().unwrap_or_default(), "Record created");
        self.dispatcher.dispatch(
            created
                .to_event(EventAction::Save)
                .with_correlation_id(correlation_id),
        );

        Ok(created)
    }

    async fn replace(
        &self,
        record: R,
        filter: &RecordFilter,
        correlation_id: &str,
    ) -> Result<R, RecordError> {
        let kind = R::KIND;
        let existing = self
            .repository
            .find_one(filter)
            .await?
            .ok_or_else(|| RecordError::missing_create_result(kind.label))?;

        let updated = self
            .repository
            .update(&record.replacing(&existing))
            .await?
            .ok_or_else(|| RecordError::missing_create_result(kind.label))?;

        info!(kind = kind.collection, id = updated.id().unwrap_or_default(), "Record replaced");
        self.dispatcher.dispatch(
            updated
                .to_event(EventAction::Update)
                .with_correlation_id(correlation_id),
        );

        Ok(updated)
    }
}

/// Identifiers are assigned by the store; any `id` sent on create is dropped.
fn without_client_id(raw: &JsonValue) -> JsonValue {
    let mut input = raw.clone();
    if let Some(fields) = input.as_object_mut() {
        fields.remove("id");
    }
    input
}
