//! Event bus adapters.
//!
//! - `InMemoryEventBus` - Synchronous, in-process bus for tests and local runs
//! - `RedisEventPublisher` - Publishes onto Redis channels
//! - `RedisEventConsumer` - Subscribes to Redis channels and runs handlers

mod in_memory;
mod redis_consumer;
mod redis_publisher;

pub use in_memory::InMemoryEventBus;
pub use redis_consumer::RedisEventConsumer;
pub use redis_publisher::RedisEventPublisher;
