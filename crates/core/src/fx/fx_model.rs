use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::FX_RATE_DISPLAY_PRECISION;

/// Latest known rate: one unit of `from_currency` buys `rate` units of `to_currency`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub id: String,
    pub from_currency: String,
    pub to_currency: String,
    #[serde(serialize_with = "serialize_decimal_6")]
    pub rate: Decimal,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl ExchangeRate {
    /// Pair key in "FROM/TO" form.
    pub fn make_pair_key(from: &str, to: &str) -> String {
        format!("{}/{}", from, to)
    }
}

fn serialize_decimal_6<S>(decimal: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let rounded = decimal.round_dp(FX_RATE_DISPLAY_PRECISION);
    serializer.serialize_str(&rounded.to_string())
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub source: String,
}

impl NewExchangeRate {
    /// Parses the `FROM/TO=RATE` form used in configuration.
    pub fn parse_pair_spec(spec: &str, source: &str) -> Option<Self> {
        let (pair, rate) = spec.trim().split_once('=')?;
        let (from, to) = pair.trim().split_once('/')?;
        let rate = rate.trim().parse::<Decimal>().ok()?;
        Some(Self {
            from_currency: from.trim().to_uppercase(),
            to_currency: to.trim().to_uppercase(),
            rate,
            source: source.to_string(),
        })
    }
}
