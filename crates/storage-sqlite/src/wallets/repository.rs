use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use investfolio_core::errors::Result;
use investfolio_core::wallets::{NewWallet, Wallet, WalletRepositoryTrait};
use investfolio_core::InvestmentError;

use super::model::WalletDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::wallets;

/// Wallet `wallet_id` when `owner_id` owns it; anyone else sees not found.
pub(crate) fn get_for_owner_in(
    conn: &mut SqliteConnection,
    wallet_id: &str,
    owner_id: &str,
) -> Result<Wallet> {
    wallets::table
        .filter(wallets::id.eq(wallet_id))
        .filter(wallets::owner_id.eq(owner_id))
        .select(WalletDB::as_select())
        .first::<WalletDB>(conn)
        .optional()
        .into_core()?
        .map(Wallet::from)
        .ok_or_else(|| InvestmentError::not_found("wallet", wallet_id).into())
}

/// Applies a signed delta in SQL, so concurrent writers never overwrite each
/// other's balance.
pub(crate) fn adjust_balance_in(
    conn: &mut SqliteConnection,
    wallet_id: &str,
    delta: i64,
) -> Result<Wallet> {
    let updated = diesel::update(wallets::table.find(wallet_id))
        .set((
            wallets::balance.eq(wallets::balance + delta),
            wallets::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(conn)
        .into_core()?;
    if updated == 0 {
        return Err(InvestmentError::not_found("wallet", wallet_id).into());
    }

    wallets::table
        .find(wallet_id)
        .select(WalletDB::as_select())
        .first::<WalletDB>(conn)
        .into_core()
        .map(Wallet::from)
}

/// Repository for wallet rows outside of a ledger action.
pub struct WalletRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl WalletRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl WalletRepositoryTrait for WalletRepository {
    async fn create(&self, new_wallet: NewWallet) -> Result<Wallet> {
        new_wallet.validate()?;
        let wallet_db: WalletDB = new_wallet.into();

        self.writer
            .exec(move |conn| {
                diesel::insert_into(wallets::table)
                    .values(&wallet_db)
                    .execute(conn)
                    .into_core()?;
                Ok(wallet_db.into())
            })
            .await
    }

    fn get_for_owner(&self, wallet_id: &str, owner_id: &str) -> Result<Wallet> {
        let mut conn = get_connection(&self.pool)?;
        get_for_owner_in(&mut conn, wallet_id, owner_id)
    }

    fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Wallet>> {
        let mut conn = get_connection(&self.pool)?;
        let results = wallets::table
            .filter(wallets::owner_id.eq(owner_id))
            .select(WalletDB::as_select())
            .order(wallets::name.asc())
            .load::<WalletDB>(&mut conn)
            .into_core()?;
        Ok(results.into_iter().map(Wallet::from).collect())
    }

    async fn adjust_balance(&self, wallet_id: &str, delta: i64) -> Result<Wallet> {
        let wallet_id = wallet_id.to_string();
        self.writer
            .exec(move |conn| adjust_balance_in(conn, &wallet_id, delta))
            .await
    }
}
