mod config;
mod domain_events;
mod main_lib;
mod price_file_provider;
mod scheduler;

use config::Config;
use investfolio_core::fx::FxServiceTrait;
use main_lib::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(&config.log_format);
    let state = build_state(&config).await?;

    let scheduler = state.price_refresh_service.clone().map(|refresher| {
        scheduler::start_price_refresh_scheduler(refresher, config.price_refresh_interval)
    });

    tracing::info!(
        "Investfolio ledger ready ({} exchange rates, db {})",
        state.fx_service.get_latest_exchange_rates()?.len(),
        state.db_path
    );
    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down");
    if let Some(handle) = scheduler {
        handle.abort();
    }
    Ok(())
}
