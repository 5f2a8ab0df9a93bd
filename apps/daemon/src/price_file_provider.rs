//! Price source backed by a JSON file mapping symbols to prices.
//!
//! The file looks like `{"AAPL": 18250, "BTC": 6500000}`: prices are in the
//! smallest unit of the investment's settlement currency per whole unit. It
//! is re-read when its modification time changes, or on every forced refresh.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::sync::Mutex;

use investfolio_core::errors::Result;
use investfolio_core::market_data::{MarketDataError, MarketDataProviderTrait};
use investfolio_core::Investment;

const PROVIDER_ID: &str = "PRICE_FILE";

struct CachedPrices {
    modified: Option<SystemTime>,
    prices: HashMap<String, i64>,
}

pub struct PriceFileProvider {
    path: PathBuf,
    cache: Mutex<Option<CachedPrices>>,
}

impl PriceFileProvider {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cache: Mutex::new(None),
        }
    }

    async fn load(&self) -> Result<HashMap<String, i64>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, e.to_string()))?;
        let parsed: HashMap<String, i64> = serde_json::from_str(&raw).map_err(|e| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("{} is not a symbol->price map: {}", self.path.display(), e),
            )
        })?;
        Ok(parsed
            .into_iter()
            .map(|(symbol, price)| (symbol.trim().to_uppercase(), price))
            .collect())
    }

    async fn prices(&self, force_refresh: bool) -> Result<HashMap<String, i64>> {
        let modified = tokio::fs::metadata(&self.path)
            .await
            .and_then(|m| m.modified())
            .ok();

        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if !force_refresh && modified.is_some() && cached.modified == modified {
                return Ok(cached.prices.clone());
            }
        }

        let prices = self.load().await?;
        tracing::debug!(
            "Loaded {} prices from {}",
            prices.len(),
            self.path.display()
        );
        *cache = Some(CachedPrices {
            modified,
            prices: prices.clone(),
        });
        Ok(prices)
    }
}

#[async_trait]
impl MarketDataProviderTrait for PriceFileProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    async fn update_prices(
        &self,
        investments: &[Investment],
        force_refresh: bool,
    ) -> Result<HashMap<String, i64>> {
        let prices = self.prices(force_refresh).await?;
        Ok(investments
            .iter()
            .filter_map(|inv| {
                prices
                    .get(&inv.symbol)
                    .map(|price| (inv.id.clone(), *price))
            })
            .collect())
    }
}
