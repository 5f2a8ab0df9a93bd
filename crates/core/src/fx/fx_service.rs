use super::currency::minor_unit_factor;
use super::fx_errors::FxError;
use super::fx_model::{ExchangeRate, NewExchangeRate};
use super::fx_traits::FxServiceTrait;
use crate::errors::Result;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory table of the latest rate per currency pair.
///
/// A pair missing in one direction is answered from its inverse.
#[derive(Clone, Default)]
pub struct FxService {
    rates: Arc<RwLock<HashMap<String, ExchangeRate>>>,
}

impl FxService {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate_currency_code(code: &str) -> Result<()> {
        if code.len() < 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(FxError::InvalidCurrencyCode(code.to_string()).into());
        }
        Ok(())
    }

    fn lookup_rate(&self, from: &str, to: &str) -> Result<Decimal> {
        if from == to {
            return Ok(Decimal::ONE);
        }

        let rates = self
            .rates
            .read()
            .map_err(|e| FxError::CacheError(e.to_string()))?;

        if let Some(direct) = rates.get(&ExchangeRate::make_pair_key(from, to)) {
            return Ok(direct.rate);
        }

        match rates.get(&ExchangeRate::make_pair_key(to, from)) {
            Some(inverse) if !inverse.rate.is_zero() => Ok(Decimal::ONE / inverse.rate),
            _ => Err(FxError::RateNotFound(format!(
                "Exchange rate not found for {}/{}",
                from, to
            ))
            .into()),
        }
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    fn get_latest_exchange_rate(&self, from_currency: &str, to_currency: &str) -> Result<Decimal> {
        self.lookup_rate(from_currency, to_currency)
    }

    fn get_latest_exchange_rates(&self) -> Result<Vec<ExchangeRate>> {
        let rates = self
            .rates
            .read()
            .map_err(|e| FxError::CacheError(e.to_string()))?;
        let mut all: Vec<ExchangeRate> = rates.values().cloned().collect();
        all.sort_by(|a, b| {
            (a.from_currency.as_str(), a.to_currency.as_str())
                .cmp(&(b.from_currency.as_str(), b.to_currency.as_str()))
        });
        Ok(all)
    }

    fn convert_currency(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<Decimal> {
        if from_currency == to_currency {
            return Ok(amount);
        }

        let rate = self.lookup_rate(from_currency, to_currency)?;
        let major = amount / minor_unit_factor(from_currency);
        major
            .checked_mul(rate)
            .and_then(|v| v.checked_mul(minor_unit_factor(to_currency)))
            .ok_or_else(|| {
                FxError::ConversionError(format!(
                    "{} {} -> {} overflows",
                    amount, from_currency, to_currency
                ))
                .into()
            })
    }

    async fn add_exchange_rate(&self, new_rate: NewExchangeRate) -> Result<ExchangeRate> {
        Self::validate_currency_code(&new_rate.from_currency)?;
        Self::validate_currency_code(&new_rate.to_currency)?;
        if new_rate.from_currency == new_rate.to_currency {
            return Err(FxError::InvalidRate(format!(
                "{} cannot be quoted against itself",
                new_rate.from_currency
            ))
            .into());
        }
        if new_rate.rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(format!(
                "{}/{} rate must be positive, got {}",
                new_rate.from_currency, new_rate.to_currency, new_rate.rate
            ))
            .into());
        }

        let key = ExchangeRate::make_pair_key(&new_rate.from_currency, &new_rate.to_currency);
        let rate = ExchangeRate {
            id: Uuid::new_v4().to_string(),
            from_currency: new_rate.from_currency,
            to_currency: new_rate.to_currency,
            rate: new_rate.rate,
            source: new_rate.source,
            timestamp: Utc::now(),
        };

        let mut rates = self
            .rates
            .write()
            .map_err(|e| FxError::CacheError(e.to_string()))?;
        rates.insert(key, rate.clone());
        log::debug!(
            "Stored exchange rate {}/{} = {}",
            rate.from_currency,
            rate.to_currency,
            rate.rate
        );
        Ok(rate)
    }
}
