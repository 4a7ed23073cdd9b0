//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `RecordRepository` - Persistence for tracked records
//! - `EventPublisher` - Publishing integration events
//! - `EventSubscriber` / `EventHandler` - Consuming integration events

mod event_publisher;
mod event_subscriber;
mod record_repository;

pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use record_repository::{
    Pagination, RecordRepository, Sort, SortDirection, MAX_PAGE_LIMIT,
};
