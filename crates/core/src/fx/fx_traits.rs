use super::fx_model::{ExchangeRate, NewExchangeRate};
use crate::errors::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait defining the contract for FX service operations.
///
/// Settlement only ever calls [`FxServiceTrait::convert_currency`]; the rest
/// feeds and inspects the rate table.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    fn get_latest_exchange_rate(&self, from_currency: &str, to_currency: &str) -> Result<Decimal>;

    fn get_latest_exchange_rates(&self) -> Result<Vec<ExchangeRate>>;

    /// Converts `amount`, expressed in the smallest unit of `from_currency`,
    /// into the smallest unit of `to_currency`. Unrounded.
    fn convert_currency(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<Decimal>;

    async fn add_exchange_rate(&self, new_rate: NewExchangeRate) -> Result<ExchangeRate>;
}
