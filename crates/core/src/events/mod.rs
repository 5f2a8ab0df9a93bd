//! Domain events module.
//!
//! Settlement emits these after an action's writes have committed. Adapters
//! implement [`DomainEventSink`] to invalidate display caches keyed by wallet.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
