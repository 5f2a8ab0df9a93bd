//! Wallet domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::wallets_constants::wallet_types;
use crate::errors::{Result, ValidationError};

/// Kind of wallet. Only [`WalletType::Investment`] wallets can hold investments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletType {
    #[default]
    Basic,
    Investment,
    Savings,
    Credit,
}

impl WalletType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            WalletType::Basic => wallet_types::BASIC,
            WalletType::Investment => wallet_types::INVESTMENT,
            WalletType::Savings => wallet_types::SAVINGS,
            WalletType::Credit => wallet_types::CREDIT,
        }
    }

    /// Parses a stored code. Unknown codes are read as [`WalletType::Basic`].
    pub fn from_db_str(value: &str) -> Self {
        match value {
            wallet_types::INVESTMENT => WalletType::Investment,
            wallet_types::SAVINGS => WalletType::Savings,
            wallet_types::CREDIT => WalletType::Credit,
            _ => WalletType::Basic,
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain model of a wallet as seen by settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub wallet_type: WalletType,
    pub currency: String,
    /// Cash balance in the smallest unit of `currency`.
    pub balance: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Wallet {
    pub fn is_investment(&self) -> bool {
        self.wallet_type == WalletType::Investment
    }
}

/// Input model for provisioning a wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWallet {
    pub id: Option<String>,
    pub owner_id: String,
    pub name: String,
    pub wallet_type: WalletType,
    pub currency: String,
    #[serde(default)]
    pub balance: i64,
}

impl NewWallet {
    pub fn validate(&self) -> Result<()> {
        if self.owner_id.trim().is_empty() {
            return Err(ValidationError::MissingField("ownerId".to_string()).into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        if self.currency.trim().len() < 3 {
            return Err(ValidationError::InvalidInput(format!(
                "Invalid wallet currency '{}'",
                self.currency
            ))
            .into());
        }
        if self.balance < 0 {
            return Err(ValidationError::InvalidInput(
                "Opening balance cannot be negative".to_string(),
            )
            .into());
        }
        Ok(())
    }
}
