//! Investfolio Core - Domain entities, services, and traits.
//!
//! This crate contains the investment ledger: fixed-point unit resolution,
//! FIFO cost lots, the investment aggregate, the transaction log and the
//! settlement service that keeps all of them in step with wallet cash.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod events;
pub mod fx;
pub mod investments;
pub mod market_data;
pub mod settings;
pub mod units;
pub mod wallets;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the types most callers need
pub use investments::*;
pub use units::{AssetType, UnitSpec};
pub use wallets::{Wallet, WalletType};

// Re-export error types
pub use errors::Error;
pub use errors::ErrorKind;
pub use errors::Result;
