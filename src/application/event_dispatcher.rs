//! EventDispatcher - fire-and-forget delivery of integration events.
//!
//! Record handlers call [`EventDispatcher::dispatch`] after a successful
//! write. The call only enqueues; a background task drains the queue in
//! order and publishes through the configured [`EventPublisher`]. Publish
//! failures are logged and never reach the request that caused them.
//!
//! ## Graceful Shutdown
//!
//! [`EventDispatcher::shutdown`] stops the worker after it has published
//! everything already queued. The worker also stops once every dispatcher
//! handle has been dropped.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

enum DispatchCommand {
    Publish(EventEnvelope),
    Flush(oneshot::Sender<()>),
}

/// Cloneable handle onto the background publishing worker.
#[derive(Clone)]
pub struct EventDispatcher {
    sender: mpsc::UnboundedSender<DispatchCommand>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl EventDispatcher {
    /// Spawns the worker on the current tokio runtime.
    pub fn spawn(publisher: Arc<dyn EventPublisher>) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let worker = DispatchWorker {
            publisher,
            receiver,
        };
        let handle = tokio::spawn(worker.run(shutdown_rx));

        (
            Self {
                sender,
                shutdown: Arc::new(shutdown_tx),
            },
            handle,
        )
    }

    /// Queues an event for publication. Never blocks and never fails.
    pub fn dispatch(&self, event: EventEnvelope) {
        let event_name = event.event_name.clone();
        if self.sender.send(DispatchCommand::Publish(event)).is_err() {
            warn!(event_name = %event_name, "Event dispatcher stopped; event dropped");
        }
    }

    /// Waits until every event dispatched before this call has been handed
    /// to the publisher.
    ///
    /// # Errors
    ///
    /// Returns `EventBusError` if the worker is no longer running.
    pub async fn flush(&self) -> Result<(), DomainError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.sender
            .send(DispatchCommand::Flush(ack_tx))
            .map_err(|_| worker_stopped())?;
        ack_rx.await.map_err(|_| worker_stopped())
    }

    /// Signals the worker to publish what is queued and stop.
    pub fn shutdown(&self) {
        // Ignore the error: no receiver means the worker already exited.
        let _ = self.shutdown.send(true);
    }
}

fn worker_stopped() -> DomainError {
    DomainError::new(ErrorCode::EventBusError, "Event dispatcher is not running")
}

struct DispatchWorker {
    publisher: Arc<dyn EventPublisher>,
    receiver: mpsc::UnboundedReceiver<DispatchCommand>,
}

impl DispatchWorker {
    async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Event dispatcher started");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.drain().await;
                        break;
                    }
                }

                command = self.receiver.recv() => {
                    match command {
                        Some(command) => self.execute(command).await,
                        None => break,
                    }
                }
            }
        }

        info!("Event dispatcher stopped");
    }

    async fn drain(&mut self) {
        self.receiver.close();
        while let Some(command) = self.receiver.recv().await {
            self.execute(command).await;
        }
    }

    async fn execute(&self, command: DispatchCommand) {
        match command {
            DispatchCommand::Publish(event) => self.publish(event).await,
            DispatchCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }

    async fn publish(&self, event: EventEnvelope) {
        let event_name = event.event_name.clone();
        let routing_key = event.routing_key.clone();

        match self.publisher.publish(event).await {
            Ok(()) => debug!(
                event_name = %event_name,
                routing_key = %routing_key,
                "Event published"
            ),
            Err(e) => warn!(
                event_name = %event_name,
                routing_key = %routing_key,
                error = %e,
                "Failed to publish event"
            ),
        }
    }
}
