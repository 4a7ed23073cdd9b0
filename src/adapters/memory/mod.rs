//! In-memory persistence adapters for tests and local runs.

mod record_store;

pub use record_store::InMemoryRecordStore;
