//! Asset class and unit models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::investments::InvestmentError;

/// Asset class of an investment. Determines quantity precision and, for
/// commodities, the currency the position settles in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Stock,
    Crypto,
    /// Domestic gold bars quoted in VND.
    GoldVnd,
    /// Spot gold quoted in USD.
    GoldUsd,
    /// Spot silver quoted in USD.
    SilverUsd,
    /// Stored rows without a recognised class. Cannot be settled.
    #[default]
    Unspecified,
}

impl AssetType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "STOCK",
            AssetType::Crypto => "CRYPTO",
            AssetType::GoldVnd => "GOLD_VND",
            AssetType::GoldUsd => "GOLD_USD",
            AssetType::SilverUsd => "SILVER_USD",
            AssetType::Unspecified => "UNSPECIFIED",
        }
    }

    /// Lenient conversion used when reading stored rows. Unknown codes map to
    /// [`AssetType::Unspecified`] and are rejected later by the resolver.
    pub fn from_db_str(value: &str) -> Self {
        value.parse().unwrap_or(AssetType::Unspecified)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = InvestmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "STOCK" => Ok(AssetType::Stock),
            "CRYPTO" => Ok(AssetType::Crypto),
            "GOLD_VND" => Ok(AssetType::GoldVnd),
            "GOLD_USD" => Ok(AssetType::GoldUsd),
            "SILVER_USD" => Ok(AssetType::SilverUsd),
            other => Err(InvestmentError::UnsupportedAssetType(other.to_string())),
        }
    }
}

/// Fixed-point description of one asset class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSpec {
    /// Stored quantity units per whole unit.
    pub scale: i64,
    /// Label of one whole unit ("share", "coin", "gram", ...).
    pub unit: &'static str,
    /// Currency the class always settles in, regardless of display currency.
    pub native_currency: Option<&'static str>,
}

impl UnitSpec {
    /// Number of decimal places a stored quantity carries.
    pub fn decimals(&self) -> u32 {
        let mut decimals = 0;
        let mut remaining = self.scale;
        while remaining >= 10 {
            remaining /= 10;
            decimals += 1;
        }
        decimals
    }

    /// Currency in which amounts of this class move to and from the wallet.
    pub fn settlement_currency<'a>(&self, investment_currency: &'a str) -> &'a str {
        self.native_currency.unwrap_or(investment_currency)
    }
}
