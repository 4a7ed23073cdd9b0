//! The contract every tracked record kind implements.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::fmt::Debug;

use crate::domain::foundation::{record_from_json, EventEnvelope, RecordId, ValidationError};

use super::{DuplicatePolicy, EventAction, RecordFilter, RecordKind};

/// A health-tracking record (sleep, activity, environment, body fat, log).
///
/// Implementors supply their validators and uniqueness semantics; the batch
/// engine and the storage adapters are generic over this trait.
pub trait TrackedRecord:
    Clone + Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: RecordKind;

    /// Server-assigned identifier; `None` while the record is new.
    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: RecordId);

    /// The owning child or institution.
    fn subject_id(&self) -> Option<&str>;

    fn set_subject_id(&mut self, subject_id: String);

    /// Checks a record about to be created.
    ///
    /// # Errors
    ///
    /// Returns the first failure along the kind's fixed precedence chain.
    fn validate_create(&self) -> Result<(), ValidationError>;

    /// Checks a partial record carrying changes to a stored one.
    ///
    /// # Errors
    ///
    /// Returns the first failure along the kind's fixed precedence chain.
    fn validate_update(&self) -> Result<(), ValidationError>;

    /// Filter matching stored records that would duplicate this one.
    fn uniqueness_filter(&self) -> RecordFilter;

    fn duplicate_policy() -> DuplicatePolicy {
        DuplicatePolicy::Reject
    }

    /// Record to store when this one replaces `existing` under
    /// [`DuplicatePolicy::Replace`].
    fn replacing(&self, existing: &Self) -> Self {
        let mut replacement = self.clone();
        if let Some(Ok(id)) = existing.id().map(|id| id.parse::<RecordId>()) {
            replacement.set_id(id);
        }
        replacement
    }

    /// Decodes client input; non-object values become an empty record.
    fn from_json(raw: &JsonValue) -> Self {
        record_from_json(raw)
    }

    fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }

    /// Shallow merge: every field present in `patch` overrides this record's.
    fn merged_with(&self, patch: &Self) -> Self {
        let mut base = self.to_json();
        if let (JsonValue::Object(target), JsonValue::Object(changes)) =
            (&mut base, patch.to_json())
        {
            for (key, value) in changes {
                target.insert(key, value);
            }
        }
        Self::from_json(&base)
    }

    /// Integration event announcing `action` on this record.
    fn to_event(&self, action: EventAction) -> EventEnvelope {
        let kind = Self::KIND;
        let event_name = kind.event_name(action);
        let mut payload = json!({
            "event_name": event_name,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        payload[kind.payload_key] = self.to_json();

        let envelope = EventEnvelope::new(event_name, kind.routing_key(action), payload);
        match self.id() {
            Some(id) => envelope.with_aggregate_id(id),
            None => envelope,
        }
    }
}
