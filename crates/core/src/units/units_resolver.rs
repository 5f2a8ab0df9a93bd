//! Precision table and fixed-point helpers.
//!
//! Every quantity in the ledger is an integer scaled by the asset class's
//! [`UnitSpec::scale`]; every amount is an integer in the smallest unit of its
//! currency. Callers must resolve the scale before doing any arithmetic.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::units_model::{AssetType, UnitSpec};
use crate::errors::{Result, ValidationError};
use crate::investments::InvestmentError;

/// Asset class -> precision lookup. `Unspecified` is deliberately absent.
pub const UNIT_TABLE: [(AssetType, UnitSpec); 5] = [
    (
        AssetType::Stock,
        UnitSpec {
            scale: 10_000,
            unit: "share",
            native_currency: None,
        },
    ),
    (
        AssetType::Crypto,
        UnitSpec {
            scale: 100_000_000,
            unit: "coin",
            native_currency: None,
        },
    ),
    (
        AssetType::GoldVnd,
        UnitSpec {
            scale: 10_000,
            unit: "gram",
            native_currency: Some("VND"),
        },
    ),
    (
        AssetType::GoldUsd,
        UnitSpec {
            scale: 10_000,
            unit: "troy_ounce",
            native_currency: Some("USD"),
        },
    ),
    (
        AssetType::SilverUsd,
        UnitSpec {
            scale: 10_000,
            unit: "troy_ounce",
            native_currency: Some("USD"),
        },
    ),
];

/// Resolves the fixed-point spec of an asset class.
pub fn resolve(asset_type: AssetType) -> Result<UnitSpec> {
    UNIT_TABLE
        .iter()
        .find(|(candidate, _)| *candidate == asset_type)
        .map(|(_, spec)| *spec)
        .ok_or_else(|| InvestmentError::UnsupportedAssetType(asset_type.to_string()).into())
}

/// Cost per whole unit: `total_cost * scale / quantity`, truncated toward zero.
///
/// Returns zero when `quantity` is not positive.
pub fn average_cost(total_cost: i64, quantity: i64, scale: i64) -> Result<i64> {
    if quantity <= 0 {
        return Ok(0);
    }
    let raw = (total_cost as i128) * (scale as i128) / (quantity as i128);
    i64::try_from(raw).map_err(|_| {
        InvestmentError::Overflow(format!(
            "average cost of {} over {} units at scale {}",
            total_cost, quantity, scale
        ))
        .into()
    })
}

/// Stored quantity expressed in whole units.
pub fn whole_units(quantity: i64, scale: i64) -> Decimal {
    Decimal::from(quantity) / Decimal::from(scale)
}

/// Value of `quantity` at `price` per whole unit, rounded half away from zero
/// to the smallest currency unit.
pub fn notional(quantity: i64, price: i64, scale: i64) -> Result<i64> {
    let gross = Decimal::from(quantity)
        .checked_mul(Decimal::from(price))
        .and_then(|v| v.checked_div(Decimal::from(scale)))
        .ok_or_else(|| {
            InvestmentError::Overflow(format!("{} units at price {}", quantity, price))
        })?;
    round_to_minor_units(gross)
}

/// Rounds a real-valued amount to the nearest smallest currency unit.
pub fn round_to_minor_units(value: Decimal) -> Result<i64> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| InvestmentError::Overflow(format!("amount {}", value)).into())
}

/// Converts a whole-unit quantity (as typed by a user) to stored fixed-point.
///
/// Rejects values carrying more decimals than the asset class supports.
pub fn to_fixed(whole: Decimal, scale: i64) -> Result<i64> {
    let scaled = whole
        .checked_mul(Decimal::from(scale))
        .ok_or_else(|| InvestmentError::Overflow(format!("quantity {}", whole)))?;
    if scaled.fract() != Decimal::ZERO {
        return Err(ValidationError::InvalidInput(format!(
            "Quantity {} has more precision than the asset supports",
            whole
        ))
        .into());
    }
    scaled.to_i64().ok_or_else(|| {
        InvestmentError::Overflow(format!("quantity {}", whole)).into()
    })
}
