use async_trait::async_trait;
use std::collections::HashMap;

use super::market_data_model::PriceRefreshOutcome;
use crate::errors::Result;
use crate::investments::Investment;

/// Source of current prices.
#[async_trait]
pub trait MarketDataProviderTrait: Send + Sync {
    /// Provider identifier used in logs.
    fn id(&self) -> &str;

    /// Latest price per whole unit for each investment, keyed by investment id,
    /// in the smallest unit of the investment's settlement currency.
    /// Investments the provider cannot price are left out of the map.
    async fn update_prices(
        &self,
        investments: &[Investment],
        force_refresh: bool,
    ) -> Result<HashMap<String, i64>>;
}

#[async_trait]
pub trait PriceRefreshServiceTrait: Send + Sync {
    /// Fetches and stores prices for every investment in `wallet_id`.
    async fn refresh_wallet(&self, wallet_id: &str, force_refresh: bool)
        -> Result<PriceRefreshOutcome>;

    /// Refreshes every wallet that holds investments. One wallet failing does
    /// not stop the others.
    async fn refresh_all(&self, force_refresh: bool) -> Result<Vec<PriceRefreshOutcome>>;
}
