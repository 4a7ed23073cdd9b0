//! Shared record vocabulary: the `TrackedRecord` contract, filters, the
//! MultiStatus envelope and record errors.

mod errors;
mod filter;
mod kind;
mod multi_status;
mod record;

pub use errors::RecordError;
pub use filter::RecordFilter;
pub use kind::{DuplicatePolicy, EventAction, RecordKind};
pub use multi_status::{MultiStatus, StatusError, StatusSuccess};
pub use record::TrackedRecord;
