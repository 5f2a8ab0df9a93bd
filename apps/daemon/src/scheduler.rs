//! Background scheduler for periodic price refresh.

use std::sync::Arc;
use std::time::Duration;

use investfolio_core::market_data::PriceRefreshServiceTrait;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Initial delay before the first refresh, so startup work settles first.
const INITIAL_DELAY_SECS: u64 = 5;

/// Starts refreshing every wallet's prices on a fixed interval.
pub fn start_price_refresh_scheduler(
    refresher: Arc<dyn PriceRefreshServiceTrait>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Price refresh scheduler started ({}s interval)", every.as_secs());
        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            run_scheduled_refresh(refresher.as_ref()).await;
        }
    })
}

async fn run_scheduled_refresh(refresher: &dyn PriceRefreshServiceTrait) {
    debug!("Running scheduled price refresh...");
    match refresher.refresh_all(false).await {
        Ok(outcomes) => {
            let updated: usize = outcomes.iter().map(|o| o.updated.len()).sum();
            info!(
                "Scheduled price refresh completed: {} prices across {} wallets",
                updated,
                outcomes.len()
            );
        }
        Err(e) => warn!("Scheduled price refresh failed: {}", e),
    }
}
