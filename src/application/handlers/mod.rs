//! Command, query and event handlers.

pub mod records;

pub use records::{
    AddRecordsCommand, AddRecordsHandler, AddRecordsResult, GetRecordHandler, GetRecordQuery,
    ListRecordsHandler, ListRecordsQuery, ListRecordsResult, RecordPayload, RecordSyncHandler,
    RemoveRecordCommand, RemoveRecordHandler, UpdateRecordCommand, UpdateRecordHandler,
};
