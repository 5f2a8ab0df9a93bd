//! Investment domain models.
//!
//! Quantities are fixed-point integers scaled by the asset class's
//! [`UnitSpec::scale`](crate::units::UnitSpec). Prices and amounts are integers
//! in the smallest unit of the investment's settlement currency, except
//! `wallet_amount`, which is in the wallet's currency.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::investments_constants::{
    MAX_NOTE_LENGTH, TRANSACTION_TYPE_BUY, TRANSACTION_TYPE_DIVIDEND, TRANSACTION_TYPE_SELL,
};
use super::investments_errors::InvestmentError;
use crate::errors::{ErrorKind, Result, ValidationError};
use crate::units::{self, AssetType, UnitSpec};
use crate::wallets::Wallet;
use crate::Error;

/// Kind of ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Buy,
    Sell,
    Dividend,
}

impl TransactionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => TRANSACTION_TYPE_BUY,
            TransactionType::Sell => TRANSACTION_TYPE_SELL,
            TransactionType::Dividend => TRANSACTION_TYPE_DIVIDEND,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = InvestmentError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            TRANSACTION_TYPE_BUY => Ok(TransactionType::Buy),
            TRANSACTION_TYPE_SELL => Ok(TransactionType::Sell),
            TRANSACTION_TYPE_DIVIDEND => Ok(TransactionType::Dividend),
            other => Err(InvestmentError::InvalidData(format!(
                "Unknown transaction type: {}",
                other
            ))),
        }
    }
}

/// Rolled-up position of one symbol inside one wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub wallet_id: String,
    pub symbol: String,
    pub name: String,
    pub asset_type: AssetType,
    /// Display currency. Commodity classes settle in their native currency instead.
    pub currency: String,
    pub quantity: i64,
    /// Cost per whole unit, `total_cost * scale / quantity`.
    pub average_cost: i64,
    pub total_cost: i64,
    pub realized_pnl: i64,
    pub total_dividends: i64,
    pub current_price: i64,
    pub price_updated_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Investment {
    pub fn unit_spec(&self) -> Result<UnitSpec> {
        units::resolve(self.asset_type)
    }

    /// Currency in which this position's amounts move to and from the wallet.
    pub fn settlement_currency<'a>(&'a self, spec: &UnitSpec) -> &'a str {
        spec.settlement_currency(&self.currency)
    }
}

/// Input model for opening a new position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestment {
    pub wallet_id: String,
    pub symbol: String,
    pub name: String,
    pub asset_type: AssetType,
    pub currency: String,
    /// Fixed-point quantity bought.
    pub quantity: i64,
    /// Amount paid for `quantity`, fees excluded.
    pub initial_cost: i64,
    #[serde(default)]
    pub fees: i64,
    /// Defaults to now.
    pub purchased_at: Option<NaiveDateTime>,
    pub note: Option<String>,
}

impl NewInvestment {
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(ValidationError::MissingField("symbol".to_string()).into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        if self.currency.trim().is_empty() {
            return Err(ValidationError::MissingField("currency".to_string()).into());
        }
        if self.wallet_id.trim().is_empty() {
            return Err(ValidationError::MissingField("walletId".to_string()).into());
        }
        if self.quantity <= 0 {
            return Err(ValidationError::InvalidInput(
                "Quantity must be greater than zero".to_string(),
            )
            .into());
        }
        if self.initial_cost <= 0 {
            return Err(ValidationError::InvalidInput(
                "Initial cost must be greater than zero".to_string(),
            )
            .into());
        }
        if self.fees < 0 {
            return Err(
                ValidationError::InvalidInput("Fees cannot be negative".to_string()).into(),
            );
        }
        validate_note(self.note.as_deref())
    }

    pub fn normalized_symbol(&self) -> String {
        self.symbol.trim().to_uppercase()
    }
}

/// Input model for a buy, sell or dividend on an existing position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestmentTransaction {
    pub transaction_type: TransactionType,
    /// Fixed-point quantity traded, or held units the dividend is paid on.
    pub quantity: i64,
    /// Price per whole unit, or dividend per whole unit.
    pub price: i64,
    #[serde(default)]
    pub fees: i64,
    pub transaction_date: NaiveDateTime,
    pub note: Option<String>,
}

impl NewInvestmentTransaction {
    pub fn validate(&self) -> Result<()> {
        if self.quantity <= 0 {
            return Err(ValidationError::InvalidInput(
                "Quantity must be greater than zero".to_string(),
            )
            .into());
        }
        if self.price <= 0 {
            return Err(ValidationError::InvalidInput(
                "Price must be greater than zero".to_string(),
            )
            .into());
        }
        if self.fees < 0 {
            return Err(
                ValidationError::InvalidInput("Fees cannot be negative".to_string()).into(),
            );
        }
        validate_note(self.note.as_deref())
    }
}

pub(crate) fn validate_note(note: Option<&str>) -> Result<()> {
    match note {
        Some(text) if text.chars().count() > MAX_NOTE_LENGTH => Err(ValidationError::InvalidInput(
            format!("Note exceeds {} characters", MAX_NOTE_LENGTH),
        )
        .into()),
        _ => Ok(()),
    }
}

/// A batch of purchased quantity with its own cost basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentLot {
    pub id: String,
    pub investment_id: String,
    pub quantity: i64,
    pub remaining_quantity: i64,
    pub average_cost: i64,
    pub total_cost: i64,
    pub purchased_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl InvestmentLot {
    pub fn is_open(&self) -> bool {
        self.remaining_quantity > 0
    }
}

/// Quantity a sell took from one lot, with that lot's cost at the time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotAllocation {
    pub lot_id: String,
    pub quantity: i64,
    pub lot_average_cost: i64,
}

/// Recorded ledger event. Only `note` may change after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentTransaction {
    pub id: String,
    pub investment_id: String,
    pub transaction_type: TransactionType,
    pub quantity: i64,
    pub price: i64,
    /// Buy cost, gross sell proceeds or gross dividend, fees excluded.
    pub cost: i64,
    pub fees: i64,
    /// Realized PNL booked by a sell, zero otherwise.
    pub realized_pnl: i64,
    pub transaction_date: NaiveDateTime,
    /// Lot created or grown by a buy, or the first lot a sell consumed.
    pub lot_id: Option<String>,
    /// Lot's open quantity right after a buy.
    pub remaining_quantity: Option<i64>,
    pub lot_allocations: Vec<LotAllocation>,
    /// Cash moved in the wallet's currency. Always non-negative.
    pub wallet_amount: i64,
    pub wallet_currency: String,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

impl InvestmentTransaction {
    /// Amount that changed hands net of fees, in settlement currency.
    pub fn net_amount(&self) -> i64 {
        match self.transaction_type {
            TransactionType::Buy => self.cost + self.fees,
            TransactionType::Sell | TransactionType::Dividend => self.cost - self.fees,
        }
    }
}

/// Outcome of a settlement action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReceipt {
    pub investment: Investment,
    pub transaction: InvestmentTransaction,
    pub wallet: Wallet,
}

/// Outcome of a cascading investment delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedInvestment {
    pub investment: Investment,
    /// Refund credited, in the wallet's currency.
    pub refunded_amount: i64,
    pub wallet: Wallet,
}

/// Read model with market valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentSummary {
    pub investment_id: String,
    pub symbol: String,
    pub asset_type: AssetType,
    pub unit: String,
    pub settlement_currency: String,
    pub quantity: i64,
    pub whole_units: rust_decimal::Decimal,
    pub average_cost: i64,
    pub total_cost: i64,
    pub current_price: i64,
    pub market_value: i64,
    pub unrealized_pnl: i64,
    pub realized_pnl: i64,
    pub total_dividends: i64,
    pub open_lots: usize,
    pub price_updated_at: Option<NaiveDateTime>,
}

/// Caller-facing envelope: a success flag, a readable message and the data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub data: Option<T>,
}

impl<T> ActionResponse<T> {
    pub fn from_result(result: std::result::Result<T, Error>, success_message: &str) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                message: success_message.to_string(),
                error_kind: None,
                data: Some(data),
            },
            Err(err) => Self {
                success: false,
                message: err.to_string(),
                error_kind: Some(err.kind()),
                data: None,
            },
        }
    }
}
