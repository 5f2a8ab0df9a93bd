//! Event queue worker for processing domain events.
//!
//! Receives events from an mpsc channel, debounces them with a 1s window,
//! then processes the batch.

use std::sync::Arc;
use std::time::Duration;

use investfolio_core::events::DomainEvent;
use investfolio_core::market_data::PriceRefreshService;
use investfolio_storage_sqlite::SqliteLedgerExecutor;
use tokio::sync::mpsc;

use super::planner::{plan_cache_invalidation, plan_price_refresh};

/// Debounce window for collecting events before processing.
const DEBOUNCE_DURATION: Duration = Duration::from_millis(1000);

/// Dependencies needed by the queue worker for processing events.
pub struct QueueWorkerDeps {
    /// Absent when no price source is configured.
    pub price_refresh_service: Option<PriceRefreshService<SqliteLedgerExecutor>>,
}

/// Runs the event queue worker until every sender is dropped.
pub async fn event_queue_worker(
    mut rx: mpsc::UnboundedReceiver<DomainEvent>,
    deps: Arc<QueueWorkerDeps>,
) {
    tracing::info!("Domain event queue worker started");

    let mut pending_events: Vec<DomainEvent> = Vec::new();

    loop {
        if pending_events.is_empty() {
            match rx.recv().await {
                Some(event) => pending_events.push(event),
                None => break,
            }
            continue;
        }

        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(e) => pending_events.push(e),
                    None => {
                        process_event_batch(&pending_events, &deps);
                        pending_events.clear();
                        break;
                    }
                }
            }
            _ = tokio::time::sleep(DEBOUNCE_DURATION) => {
                let batch = std::mem::take(&mut pending_events);
                process_event_batch(&batch, &deps);
            }
        }
    }

    tracing::info!("Domain event queue worker shutting down");
}

fn process_event_batch(events: &[DomainEvent], deps: &QueueWorkerDeps) {
    if events.is_empty() {
        return;
    }
    tracing::debug!("Processing {} domain events", events.len());

    for wallet_id in plan_cache_invalidation(events) {
        tracing::info!(wallet_id = %wallet_id, "Wallet display values invalidated");
    }

    if let Some(refresher) = &deps.price_refresh_service {
        for wallet_id in plan_price_refresh(events) {
            // Detached: the refresh outlives this batch and commits on its own.
            refresher.spawn_refresh(&wallet_id, false);
        }
    }
}
