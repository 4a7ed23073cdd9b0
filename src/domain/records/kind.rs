//! Static description of a record kind: names, messages and bus routing.

use std::fmt;

/// What happened to a record; drives event names and routing keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventAction {
    Save,
    Update,
    Delete,
}

impl EventAction {
    /// Routing-key suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventAction::Save => "save",
            EventAction::Update => "update",
            EventAction::Delete => "delete",
        }
    }

    fn event_part(&self) -> &'static str {
        match self {
            EventAction::Save => "Save",
            EventAction::Update => "Update",
            EventAction::Delete => "Delete",
        }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the batch engine does when the uniqueness check finds a stored match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Report the item as a 409 conflict.
    Reject,
    /// Overwrite the stored record and report success.
    Replace,
}

/// Per-kind constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordKind {
    /// Human name used in validation descriptions, e.g. `Physical Activity`.
    pub label: &'static str,
    /// Storage collection / table discriminator.
    pub collection: &'static str,
    /// Event name stem, e.g. `PhysicalActivity` → `PhysicalActivitySaveEvent`.
    pub event_stem: &'static str,
    /// Routing-key prefix, e.g. `physicalactivities`.
    pub routing_prefix: &'static str,
    /// Key under which the record is carried in event payloads.
    pub payload_key: &'static str,
    /// Field referencing the owning subject.
    pub subject_field: &'static str,
    /// Name clients use for the record's own id, e.g. `sleep_id`.
    pub id_param: &'static str,
    pub already_registered: &'static str,
}

impl RecordKind {
    pub fn event_name(&self, action: EventAction) -> String {
        format!("{}{}Event", self.event_stem, action.event_part())
    }

    pub fn routing_key(&self, action: EventAction) -> String {
        format!("{}.{}", self.routing_prefix, action.as_str())
    }

    /// Routing key of inbound sync events carrying records from devices.
    pub fn sync_routing_key(&self) -> String {
        format!("{}.sync", self.routing_prefix)
    }

    pub fn not_found(&self) -> String {
        format!("{} not found!", self.label)
    }
}
