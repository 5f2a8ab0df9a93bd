//! Domain events runtime bridge for the daemon.
//!
//! Receives domain events via DomainEventSink, debounces them, and:
//! - logs which wallets' cached display values are now stale
//! - refreshes prices for wallets whose investments changed
//!
//! Events are debounced with a 1-second window and processed by the queue
//! worker.

mod planner;
mod queue_worker;
mod sink;

pub use queue_worker::QueueWorkerDeps;
pub use sink::DaemonDomainEventSink;
