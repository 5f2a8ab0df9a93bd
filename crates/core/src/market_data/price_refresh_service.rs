use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::market_data_model::PriceRefreshOutcome;
use super::market_data_traits::{MarketDataProviderTrait, PriceRefreshServiceTrait};
use crate::errors::{ErrorKind, Result};
use crate::events::{DomainEvent, DomainEventSink, NoOpDomainEventSink};
use crate::investments::LedgerTransactionExecutor;

/// Pulls prices from a provider and writes them onto investments.
///
/// Runs off the settlement path: it only touches `current_price` and
/// `price_updated_at`, and reports through `PricesRefreshed` events.
pub struct PriceRefreshService<X: LedgerTransactionExecutor + Clone> {
    executor: X,
    provider: Arc<dyn MarketDataProviderTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl<X: LedgerTransactionExecutor + Clone> Clone for PriceRefreshService<X> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            provider: self.provider.clone(),
            event_sink: self.event_sink.clone(),
        }
    }
}

impl<X: LedgerTransactionExecutor + Clone + 'static> PriceRefreshService<X> {
    pub fn new(executor: X, provider: Arc<dyn MarketDataProviderTrait>) -> Self {
        Self {
            executor,
            provider,
            event_sink: Arc::new(NoOpDomainEventSink),
        }
    }

    /// Sets the domain event sink for this service.
    pub fn with_event_sink(mut self, event_sink: Arc<dyn DomainEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    /// Refreshes `wallet_id` on a detached task.
    ///
    /// The task owns its own handle to storage and the provider, so it keeps
    /// running after the caller returns. Failures are logged.
    pub fn spawn_refresh(&self, wallet_id: &str, force_refresh: bool) -> JoinHandle<()> {
        let service = self.clone();
        let wallet_id = wallet_id.to_string();
        tokio::spawn(async move {
            if let Err(e) = service.refresh_wallet(&wallet_id, force_refresh).await {
                warn!("Background price refresh for wallet {} failed: {}", wallet_id, e);
            }
        })
    }
}

#[async_trait]
impl<X: LedgerTransactionExecutor + Clone + 'static> PriceRefreshServiceTrait
    for PriceRefreshService<X>
{
    async fn refresh_wallet(
        &self,
        wallet_id: &str,
        force_refresh: bool,
    ) -> Result<PriceRefreshOutcome> {
        let id = wallet_id.to_string();
        let investments = self
            .executor
            .read(move |store| store.list_investments_for_wallet(&id))
            .await?;
        let refreshed_at = Utc::now().naive_utc();

        if investments.is_empty() {
            debug!("Wallet {} holds no investments; nothing to price", wallet_id);
            return Ok(PriceRefreshOutcome {
                wallet_id: wallet_id.to_string(),
                updated: Vec::new(),
                skipped: Vec::new(),
                refreshed_at,
            });
        }

        let prices = self
            .provider
            .update_prices(&investments, force_refresh)
            .await?;

        let mut updates = Vec::new();
        let mut skipped = Vec::new();
        for investment in &investments {
            match prices.get(&investment.id) {
                Some(&price) if price > 0 => updates.push((investment.id.clone(), price)),
                Some(&price) => {
                    warn!(
                        "Provider {} returned unusable price {} for {}",
                        self.provider.id(),
                        price,
                        investment.symbol
                    );
                    skipped.push(investment.id.clone());
                }
                None => skipped.push(investment.id.clone()),
            }
        }

        let updated = if updates.is_empty() {
            Vec::new()
        } else {
            self.executor
                .execute(move |store| {
                    let mut written = Vec::with_capacity(updates.len());
                    for (investment_id, price) in updates {
                        match store.update_current_price(&investment_id, price, refreshed_at) {
                            Ok(()) => written.push(investment_id),
                            // Deleted since it was read.
                            Err(e) if e.kind() == ErrorKind::NotFound => {
                                debug!("Skipping price for removed investment {}", investment_id)
                            }
                            Err(e) => return Err(e),
                        }
                    }
                    Ok(written)
                })
                .await?
        };

        if !updated.is_empty() {
            self.event_sink
                .emit(DomainEvent::prices_refreshed(wallet_id, updated.clone()));
        }
        info!(
            "Refreshed {} price(s) in wallet {} via {} ({} skipped)",
            updated.len(),
            wallet_id,
            self.provider.id(),
            skipped.len()
        );

        Ok(PriceRefreshOutcome {
            wallet_id: wallet_id.to_string(),
            updated,
            skipped,
            refreshed_at,
        })
    }

    async fn refresh_all(&self, force_refresh: bool) -> Result<Vec<PriceRefreshOutcome>> {
        let wallet_ids = self
            .executor
            .read(|store| store.list_wallet_ids_with_investments())
            .await?;

        let mut outcomes = Vec::with_capacity(wallet_ids.len());
        for wallet_id in wallet_ids {
            match self.refresh_wallet(&wallet_id, force_refresh).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => warn!("Price refresh for wallet {} failed: {}", wallet_id, e),
            }
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MockDomainEventSink;
    use crate::investments::Investment;
    use crate::market_data::MarketDataError;
    use crate::test_support::MemoryLedgerExecutor;
    use crate::units::AssetType;
    use crate::wallets::WalletType;
    use crate::Error;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockProvider {
        by_symbol: HashMap<String, i64>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockProvider {
        fn with_prices(prices: &[(&str, i64)]) -> Self {
            Self {
                by_symbol: prices
                    .iter()
                    .map(|(symbol, price)| (symbol.to_string(), *price))
                    .collect(),
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                by_symbol: HashMap::new(),
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl MarketDataProviderTrait for MockProvider {
        fn id(&self) -> &str {
            "MOCK"
        }

        async fn update_prices(
            &self,
            investments: &[Investment],
            _force_refresh: bool,
        ) -> Result<HashMap<String, i64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(MarketDataError::provider("MOCK", "feed offline").into());
            }
            Ok(investments
                .iter()
                .filter_map(|inv| {
                    self.by_symbol
                        .get(&inv.symbol)
                        .map(|price| (inv.id.clone(), *price))
                })
                .collect())
        }
    }

    fn seed_investment(executor: &MemoryLedgerExecutor, id: &str, wallet_id: &str, symbol: &str) {
        executor.with_state(|state| {
            state.investments.insert(
                id.to_string(),
                Investment {
                    id: id.to_string(),
                    wallet_id: wallet_id.to_string(),
                    symbol: symbol.to_string(),
                    name: symbol.to_string(),
                    asset_type: AssetType::Stock,
                    currency: "USD".to_string(),
                    quantity: 10_000,
                    average_cost: 100,
                    total_cost: 100,
                    ..Default::default()
                },
            );
        });
    }

    fn setup(provider: MockProvider) -> (
        PriceRefreshService<MemoryLedgerExecutor>,
        MemoryLedgerExecutor,
        MockDomainEventSink,
        Arc<MockProvider>,
    ) {
        let executor = MemoryLedgerExecutor::new();
        executor.seed_wallet("w1", "owner", WalletType::Investment, "USD", 0);
        seed_investment(&executor, "inv-aapl", "w1", "AAPL");
        seed_investment(&executor, "inv-msft", "w1", "MSFT");
        let events = MockDomainEventSink::new();
        let provider = Arc::new(provider);
        let service = PriceRefreshService::new(executor.clone(), provider.clone())
            .with_event_sink(Arc::new(events.clone()));
        (service, executor, events, provider)
    }

    #[tokio::test]
    async fn test_refresh_wallet_writes_prices_and_notifies() {
        let (service, executor, events, _) = setup(MockProvider::with_prices(&[("AAPL", 180)]));

        let outcome = service.refresh_wallet("w1", false).await.unwrap();

        assert_eq!(outcome.updated, vec!["inv-aapl".to_string()]);
        assert_eq!(outcome.skipped, vec!["inv-msft".to_string()]);
        let state = executor.snapshot();
        assert_eq!(state.investments["inv-aapl"].current_price, 180);
        assert_eq!(
            state.investments["inv-aapl"].price_updated_at,
            Some(outcome.refreshed_at)
        );
        assert_eq!(state.investments["inv-msft"].current_price, 0);
        assert_eq!(
            events.events(),
            vec![DomainEvent::prices_refreshed("w1", vec!["inv-aapl".to_string()])]
        );
    }

    #[tokio::test]
    async fn test_non_positive_prices_are_skipped() {
        let (service, executor, events, _) =
            setup(MockProvider::with_prices(&[("AAPL", 0), ("MSFT", -5)]));

        let outcome = service.refresh_wallet("w1", true).await.unwrap();

        assert!(outcome.is_empty());
        assert_eq!(outcome.skipped.len(), 2);
        assert!(executor
            .snapshot()
            .investments
            .values()
            .all(|inv| inv.price_updated_at.is_none()));
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_writes_nothing() {
        let (service, executor, events, _) = setup(MockProvider::failing());

        let err = service.refresh_wallet("w1", false).await.unwrap_err();

        assert!(matches!(err, Error::MarketData(_)));
        assert!(executor
            .snapshot()
            .investments
            .values()
            .all(|inv| inv.current_price == 0));
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_empty_wallet_skips_provider() {
        let (service, _, _, provider) = setup(MockProvider::with_prices(&[("AAPL", 180)]));

        let outcome = service.refresh_wallet("empty-wallet", false).await.unwrap();

        assert!(outcome.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_spawned_refresh_outlives_caller() {
        let (service, executor, _, _) =
            setup(MockProvider::with_prices(&[("AAPL", 180), ("MSFT", 400)]));

        let handle = service.spawn_refresh("w1", false);
        drop(service);
        handle.await.unwrap();

        let state = executor.snapshot();
        assert_eq!(state.investments["inv-aapl"].current_price, 180);
        assert_eq!(state.investments["inv-msft"].current_price, 400);
    }

    #[tokio::test]
    async fn test_refresh_all_covers_every_wallet() {
        let (service, executor, events, provider) =
            setup(MockProvider::with_prices(&[("AAPL", 180), ("VNM", 75_000)]));
        executor.seed_wallet("w2", "owner", WalletType::Investment, "VND", 0);
        seed_investment(&executor, "inv-vnm", "w2", "VNM");

        let outcomes = service.refresh_all(false).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            executor.snapshot().investments["inv-vnm"].current_price,
            75_000
        );
        assert_eq!(events.len(), 2);
    }
}
