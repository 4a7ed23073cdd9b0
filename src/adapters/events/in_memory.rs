//! In-memory event bus.
//!
//! Delivers events synchronously to subscribed handlers. A capturing bus
//! (`new`) also keeps every published envelope for assertions; the binary
//! uses `routing_only`, which keeps nothing.
//!
//! Lock poisoning panics; the adapter is not meant for production traffic.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber};

/// In-memory event bus keyed by routing key.
pub struct InMemoryEventBus {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
    published: RwLock<Vec<EventEnvelope>>,
    capture: bool,
    fail_publish: AtomicBool,
}

impl InMemoryEventBus {
    /// A bus that records every published envelope.
    pub fn new() -> Self {
        Self::with_capture(true)
    }

    /// A bus that only routes to handlers; published envelopes are dropped
    /// once delivered.
    pub fn routing_only() -> Self {
        Self::with_capture(false)
    }

    fn with_capture(capture: bool) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            published: RwLock::new(Vec::new()),
            capture,
            fail_publish: AtomicBool::new(false),
        }
    }

    /// A bus whose `publish` always fails with `EventBusError`.
    pub fn failing() -> Self {
        let bus = Self::new();
        bus.set_failing(true);
        bus
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_publish.store(failing, Ordering::SeqCst);
    }

    // === Test Helpers ===

    /// Returns all published events.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .clone()
    }

    /// Returns events with the given name, e.g. `SleepSaveEvent`.
    pub fn events_named(&self, event_name: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.event_name == event_name)
            .collect()
    }

    /// Returns events published on a routing key.
    pub fn events_on(&self, routing_key: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.routing_key == routing_key)
            .collect()
    }

    pub fn clear(&self) {
        self.published
            .write()
            .expect("InMemoryEventBus: published write lock poisoned")
            .clear();
    }

    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .len()
    }

    pub fn has_event(&self, event_name: &str) -> bool {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .iter()
            .any(|e| e.event_name == event_name)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if self.fail_publish.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::EventBusError,
                format!("Simulated publish failure for {}", event.event_name),
            ));
        }

        if self.capture {
            self.published
                .write()
                .expect("InMemoryEventBus: published write lock poisoned")
                .push(event.clone());
        }

        // Clone handlers to release lock before await points
        let key_handlers: Vec<Arc<dyn EventHandler>> = {
            let handlers = self
                .handlers
                .read()
                .expect("InMemoryEventBus: handlers lock poisoned");
            handlers
                .get(&event.routing_key)
                .cloned()
                .unwrap_or_default()
        };

        let mut errors = Vec::new();
        for handler in key_handlers {
            if let Err(e) = handler.handle(event.clone()).await {
                errors.push(format!("{}: {}", handler.name(), e));
            }
        }

        if !errors.is_empty() {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Handler errors: {}", errors.join(", ")),
            ));
        }

        Ok(())
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, routing_key: &str, handler: Arc<dyn EventHandler>) {
        let mut handlers = self
            .handlers
            .write()
            .expect("InMemoryEventBus: handlers write lock poisoned");
        handlers
            .entry(routing_key.to_string())
            .or_default()
            .push(handler);
    }
}
