//! Wallets module - the cash side of investment settlement.
//!
//! Settlement reads a wallet for its owner and moves its balance by signed
//! deltas. Provisioning is limited to creating a wallet with an opening
//! balance.

mod wallets_constants;
mod wallets_model;
mod wallets_traits;

pub use wallets_constants::*;
pub use wallets_model::{NewWallet, Wallet, WalletType};
pub use wallets_traits::WalletRepositoryTrait;
