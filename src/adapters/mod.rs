//! Adapters - Implementations of port interfaces.
//!
//! - `events` - Event bus implementations (in-memory, Redis)
//! - `memory` - Process-local record store
//! - `postgres` - JSONB document store
//! - `http` - REST API

pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;

pub use events::{InMemoryEventBus, RedisEventConsumer, RedisEventPublisher};
pub use memory::InMemoryRecordStore;
pub use postgres::PostgresRecordStore;
