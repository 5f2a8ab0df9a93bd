//! Database model for wallets.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use investfolio_core::wallets::{NewWallet, Wallet, WalletType};

/// Database model for wallets
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::wallets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WalletDB {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub wallet_type: String,
    pub currency: String,
    pub balance: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<WalletDB> for Wallet {
    fn from(db: WalletDB) -> Self {
        Self {
            id: db.id,
            owner_id: db.owner_id,
            name: db.name,
            wallet_type: WalletType::from_db_str(&db.wallet_type),
            currency: db.currency,
            balance: db.balance,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewWallet> for WalletDB {
    fn from(domain: NewWallet) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            owner_id: domain.owner_id,
            name: domain.name.trim().to_string(),
            wallet_type: domain.wallet_type.as_str().to_string(),
            currency: domain.currency.trim().to_uppercase(),
            balance: domain.balance,
            created_at: now,
            updated_at: now,
        }
    }
}
