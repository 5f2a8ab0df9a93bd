//! Investment-specific error types.

use thiserror::Error;

use crate::errors::ErrorKind;

/// Domain failures raised by the ledger and the settlement service.
#[derive(Error, Debug)]
pub enum InvestmentError {
    #[error("Invalid investment data: {0}")]
    InvalidData(String),

    #[error("Transaction date {0} is in the future")]
    FutureDate(String),

    #[error("Wallet {wallet_id} is a {wallet_type} wallet, investments need an INVESTMENT wallet")]
    WrongWalletType {
        wallet_id: String,
        wallet_type: String,
    },

    #[error("Symbol {symbol} is already held in wallet {wallet_id}")]
    DuplicateSymbol { symbol: String, wallet_id: String },

    #[error("Insufficient balance: required {required} {currency}, available {available}")]
    InsufficientBalance {
        required: i64,
        available: i64,
        currency: String,
    },

    #[error("Insufficient quantity: requested {requested}, held {available}")]
    InsufficientQuantity { requested: i64, available: i64 },

    #[error("Insufficient open lots: requested {requested}, open {available}")]
    InsufficientLots { requested: i64, available: i64 },

    #[error("Lot {lot_id} would hold {restored} open against a size of {size}")]
    LotOverfilled {
        lot_id: String,
        restored: i64,
        size: i64,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported asset type: {0}")]
    UnsupportedAssetType(String),

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
}

impl InvestmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidData(_)
            | Self::FutureDate(_)
            | Self::WrongWalletType { .. }
            | Self::UnsupportedAssetType(_)
            | Self::Overflow(_) => ErrorKind::Validation,
            Self::DuplicateSymbol { .. } => ErrorKind::Conflict,
            Self::InsufficientBalance { .. }
            | Self::InsufficientQuantity { .. }
            | Self::InsufficientLots { .. } => ErrorKind::InsufficientResource,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::LotOverfilled { .. } => ErrorKind::Internal,
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound(format!("{} {}", entity, id))
    }
}
