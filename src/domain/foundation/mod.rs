//! Foundation module - Shared domain primitives.
//!
//! Identifiers, field presence, error types and the event envelope that
//! every record kind builds on.

mod command;
mod errors;
mod events;
mod field;
mod ids;

pub use command::CommandMetadata;
pub use errors::{
    DomainError, ErrorCode, ValidationError, INVALID_FIELDS_MESSAGE, NEGATIVE_VALUE,
    REQUIRED_FIELDS_MESSAGE,
};
pub use events::{EventEnvelope, EventId, EventMetadata};
pub use field::{record_from_json, Field};
pub use ids::{is_record_id, RecordId, RECORD_ID_LEN};
