use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Result of refreshing one wallet's prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRefreshOutcome {
    pub wallet_id: String,
    /// Investments whose `current_price` was written.
    pub updated: Vec<String>,
    /// Investments the provider returned no usable price for.
    pub skipped: Vec<String>,
    pub refreshed_at: NaiveDateTime,
}

impl PriceRefreshOutcome {
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty()
    }
}
