//! Domain event types.

use serde::{Deserialize, Serialize};

/// Facts about committed ledger changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Investments, their lots or transactions were created, changed or deleted.
    InvestmentsChanged {
        wallet_id: String,
        investment_ids: Vec<String>,
    },

    /// Cash moved in or out of the wallet.
    WalletBalanceChanged { wallet_id: String },

    /// Current prices were written back for the listed investments.
    PricesRefreshed {
        wallet_id: String,
        investment_ids: Vec<String>,
    },
}

impl DomainEvent {
    pub fn investments_changed(wallet_id: impl Into<String>, investment_ids: Vec<String>) -> Self {
        Self::InvestmentsChanged {
            wallet_id: wallet_id.into(),
            investment_ids,
        }
    }

    pub fn wallet_balance_changed(wallet_id: impl Into<String>) -> Self {
        Self::WalletBalanceChanged {
            wallet_id: wallet_id.into(),
        }
    }

    pub fn prices_refreshed(wallet_id: impl Into<String>, investment_ids: Vec<String>) -> Self {
        Self::PricesRefreshed {
            wallet_id: wallet_id.into(),
            investment_ids,
        }
    }

    /// Wallet whose cached display values this event invalidates.
    pub fn wallet_id(&self) -> &str {
        match self {
            Self::InvestmentsChanged { wallet_id, .. }
            | Self::WalletBalanceChanged { wallet_id }
            | Self::PricesRefreshed { wallet_id, .. } => wallet_id,
        }
    }
}
