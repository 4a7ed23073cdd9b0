//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresRecordStore` - JSONB document storage shared by every record kind

mod record_store;

pub use record_store::PostgresRecordStore;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
