//! Record handlers, generic over every tracked record kind.
//!
//! Commands:
//! - `AddRecordsHandler` - single or batch add (MultiStatus)
//! - `UpdateRecordHandler` - partial update
//! - `RemoveRecordHandler` - delete
//!
//! Queries:
//! - `GetRecordHandler`, `ListRecordsHandler`
//!
//! Event handlers:
//! - `RecordSyncHandler` - records arriving on the message bus

mod add_records;
mod get_records;
mod remove_record;
mod sync_records;
mod update_record;

pub use add_records::{AddRecordsCommand, AddRecordsHandler, AddRecordsResult, RecordPayload};
pub use get_records::{
    GetRecordHandler, GetRecordQuery, ListRecordsHandler, ListRecordsQuery, ListRecordsResult,
};
pub use remove_record::{RemoveRecordCommand, RemoveRecordHandler};
pub use sync_records::RecordSyncHandler;
pub use update_record::{UpdateRecordCommand, UpdateRecordHandler};
