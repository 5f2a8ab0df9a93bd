use async_trait::async_trait;

use super::wallets_model::{NewWallet, Wallet};
use crate::errors::Result;

/// Wallet cash collaborator.
///
/// Balance changes are signed deltas in the wallet's currency; sufficiency
/// checks belong to the caller.
#[async_trait]
pub trait WalletRepositoryTrait: Send + Sync {
    async fn create(&self, new_wallet: NewWallet) -> Result<Wallet>;
    fn get_for_owner(&self, wallet_id: &str, owner_id: &str) -> Result<Wallet>;
    fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Wallet>>;
    async fn adjust_balance(&self, wallet_id: &str, delta: i64) -> Result<Wallet>;
}
