//! Domain event sink that forwards into the queue worker.

use std::sync::{Arc, Mutex, PoisonError};

use investfolio_core::events::{DomainEvent, DomainEventSink};
use tokio::sync::mpsc;

use super::queue_worker::{event_queue_worker, QueueWorkerDeps};

/// Buffers events until [`DaemonDomainEventSink::start_worker`] is called,
/// so services can be built with the sink before the worker's dependencies
/// exist.
pub struct DaemonDomainEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<DomainEvent>>>,
}

impl DaemonDomainEventSink {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Starts the queue worker. Only the first call has any effect.
    pub fn start_worker(&self, deps: Arc<QueueWorkerDeps>) {
        let rx = self
            .rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match rx {
            Some(rx) => {
                tokio::spawn(event_queue_worker(rx, deps));
            }
            None => tracing::warn!("Domain event worker already started"),
        }
    }
}

impl Default for DaemonDomainEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainEventSink for DaemonDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Domain event dropped: worker has shut down");
        }
    }
}
