use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use investfolio_core::{
    events::DomainEventSink,
    fx::{FxService, FxServiceTrait, NewExchangeRate},
    market_data::{MarketDataProviderTrait, PriceRefreshService},
    InvestmentService,
};
use investfolio_storage_sqlite::{
    create_pool, init, run_migrations, spawn_writer, DbPool, SqliteLedgerExecutor,
    WalletRepository,
};

use crate::config::Config;
use crate::domain_events::{DaemonDomainEventSink, QueueWorkerDeps};
use crate::price_file_provider::PriceFileProvider;

/// Services a transport layer calls into. The daemon itself only drives
/// price refresh, so most fields are read by embedders and tests.
#[allow(dead_code)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub db_path: String,
    pub domain_event_sink: Arc<DaemonDomainEventSink>,
    pub fx_service: Arc<FxService>,
    pub wallet_repository: Arc<WalletRepository>,
    pub investment_service: Arc<InvestmentService<SqliteLedgerExecutor>>,
    pub price_refresh_service: Option<Arc<PriceRefreshService<SqliteLedgerExecutor>>>,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Loads `FROM/TO=RATE` entries into the FX table. Returns how many loaded.
pub async fn seed_exchange_rates(fx_service: &FxService, specs: &[String]) -> usize {
    let mut loaded = 0;
    for spec in specs {
        let Some(rate) = NewExchangeRate::parse_pair_spec(spec, "CONFIG") else {
            tracing::warn!("Skipping malformed exchange rate entry {:?}", spec);
            continue;
        };
        match fx_service.add_exchange_rate(rate).await {
            Ok(_) => loaded += 1,
            Err(e) => tracing::warn!("Skipping exchange rate {:?}: {}", spec, e),
        }
    }
    loaded
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = create_pool(&db_path)?;
    run_migrations(&pool)?;
    let writer = spawn_writer(&pool)?;
    let executor = SqliteLedgerExecutor::new(pool.clone(), writer.clone());

    let fx_service = Arc::new(FxService::new());
    let loaded = seed_exchange_rates(&fx_service, &config.fx_rates).await;
    tracing::info!("Loaded {} exchange rates", loaded);

    // Two-phase: services get the sink now, the worker starts once the
    // price refresher it drives exists.
    let domain_event_sink = Arc::new(DaemonDomainEventSink::new());
    let sink: Arc<dyn DomainEventSink> = domain_event_sink.clone();

    let wallet_repository = Arc::new(WalletRepository::new(pool.clone(), writer));
    let investment_service = Arc::new(
        InvestmentService::new(executor.clone(), fx_service.clone())
            .with_event_sink(sink.clone())
            .with_settings(config.settlement_settings()),
    );

    let price_refresh_service = config.prices_file.as_ref().map(|path| {
        tracing::info!("Prices are read from {}", path.display());
        let provider: Arc<dyn MarketDataProviderTrait> =
            Arc::new(PriceFileProvider::new(path.clone()));
        Arc::new(PriceRefreshService::new(executor.clone(), provider).with_event_sink(sink.clone()))
    });
    if price_refresh_service.is_none() {
        tracing::info!("IF_PRICES_FILE not set; price refresh disabled");
    }

    domain_event_sink.start_worker(Arc::new(QueueWorkerDeps {
        price_refresh_service: price_refresh_service.as_deref().cloned(),
    }));

    Ok(Arc::new(AppState {
        pool,
        db_path,
        domain_event_sink,
        fx_service,
        wallet_repository,
        investment_service,
        price_refresh_service,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use investfolio_core::InvestmentServiceTrait;

    #[tokio::test]
    async fn test_seed_skips_bad_entries() {
        let fx = FxService::new();
        let specs = vec![
            "USD/VND=25000".to_string(),
            "garbage".to_string(),
            "USD/USD=1".to_string(),
        ];
        assert_eq!(seed_exchange_rates(&fx, &specs).await, 1);
        assert!(fx.get_latest_exchange_rate("USD", "VND").is_ok());
    }

    #[tokio::test]
    async fn test_build_state_wires_storage() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            db_path: dir.path().join("ledger.db").to_string_lossy().to_string(),
            merge_window_hours: 24,
            action_timeout: std::time::Duration::from_secs(5),
            price_refresh_interval: std::time::Duration::from_secs(60),
            prices_file: None,
            fx_rates: vec!["USD/VND=25000".to_string()],
            log_format: "text".to_string(),
        };

        let state = build_state(&config).await.unwrap();
        assert!(state.price_refresh_service.is_none());
        let err = state
            .investment_service
            .list_investments("owner", "missing-wallet")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), investfolio_core::ErrorKind::NotFound);
    }
}
