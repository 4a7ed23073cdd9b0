//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (add, update, remove) announce their writes through the
//! `EventDispatcher`; query handlers only read.

mod event_dispatcher;
pub mod handlers;

pub use event_dispatcher::EventDispatcher;
pub use handlers::{
    AddRecordsCommand, AddRecordsHandler, AddRecordsResult, GetRecordHandler, GetRecordQuery,
    ListRecordsHandler, ListRecordsQuery, ListRecordsResult, RecordPayload, RecordSyncHandler,
    RemoveRecordCommand, RemoveRecordHandler, UpdateRecordCommand, UpdateRecordHandler,
};
