//! Database models for investments, lots and the transaction log.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use investfolio_core::{
    AssetType, Investment, InvestmentLot, InvestmentTransaction, LotAllocation, TransactionType,
};

use crate::errors::StorageError;

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
#[diesel(table_name = crate::schema::investments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct InvestmentDB {
    pub id: String,
    pub wallet_id: String,
    pub symbol: String,
    pub name: String,
    pub asset_type: String,
    pub currency: String,
    pub quantity: i64,
    pub average_cost: i64,
    pub total_cost: i64,
    pub realized_pnl: i64,
    pub total_dividends: i64,
    pub current_price: i64,
    pub price_updated_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<InvestmentDB> for Investment {
    fn from(db: InvestmentDB) -> Self {
        Self {
            id: db.id,
            wallet_id: db.wallet_id,
            symbol: db.symbol,
            name: db.name,
            asset_type: AssetType::from_db_str(&db.asset_type),
            currency: db.currency,
            quantity: db.quantity,
            average_cost: db.average_cost,
            total_cost: db.total_cost,
            realized_pnl: db.realized_pnl,
            total_dividends: db.total_dividends,
            current_price: db.current_price,
            price_updated_at: db.price_updated_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<&Investment> for InvestmentDB {
    fn from(domain: &Investment) -> Self {
        Self {
            id: domain.id.clone(),
            wallet_id: domain.wallet_id.clone(),
            symbol: domain.symbol.clone(),
            name: domain.name.clone(),
            asset_type: domain.asset_type.as_str().to_string(),
            currency: domain.currency.clone(),
            quantity: domain.quantity,
            average_cost: domain.average_cost,
            total_cost: domain.total_cost,
            realized_pnl: domain.realized_pnl,
            total_dividends: domain.total_dividends,
            current_price: domain.current_price,
            price_updated_at: domain.price_updated_at,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

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
#[diesel(table_name = crate::schema::investment_lots)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvestmentLotDB {
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

impl From<InvestmentLotDB> for InvestmentLot {
    fn from(db: InvestmentLotDB) -> Self {
        Self {
            id: db.id,
            investment_id: db.investment_id,
            quantity: db.quantity,
            remaining_quantity: db.remaining_quantity,
            average_cost: db.average_cost,
            total_cost: db.total_cost,
            purchased_at: db.purchased_at,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<&InvestmentLot> for InvestmentLotDB {
    fn from(domain: &InvestmentLot) -> Self {
        Self {
            id: domain.id.clone(),
            investment_id: domain.investment_id.clone(),
            quantity: domain.quantity,
            remaining_quantity: domain.remaining_quantity,
            average_cost: domain.average_cost,
            total_cost: domain.total_cost,
            purchased_at: domain.purchased_at,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

/// Transaction row. `lot_allocations` holds the JSON array of
/// [`LotAllocation`]s a sell consumed.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::investment_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvestmentTransactionDB {
    pub id: String,
    pub investment_id: String,
    pub transaction_type: String,
    pub quantity: i64,
    pub price: i64,
    pub cost: i64,
    pub fees: i64,
    pub realized_pnl: i64,
    pub transaction_date: NaiveDateTime,
    pub lot_id: Option<String>,
    pub remaining_quantity: Option<i64>,
    pub lot_allocations: String,
    pub wallet_amount: i64,
    pub wallet_currency: String,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<InvestmentTransactionDB> for InvestmentTransaction {
    type Error = StorageError;

    fn try_from(db: InvestmentTransactionDB) -> Result<Self, Self::Error> {
        let transaction_type = TransactionType::from_str(&db.transaction_type)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        let lot_allocations: Vec<LotAllocation> = serde_json::from_str(&db.lot_allocations)?;

        Ok(Self {
            id: db.id,
            investment_id: db.investment_id,
            transaction_type,
            quantity: db.quantity,
            price: db.price,
            cost: db.cost,
            fees: db.fees,
            realized_pnl: db.realized_pnl,
            transaction_date: db.transaction_date,
            lot_id: db.lot_id,
            remaining_quantity: db.remaining_quantity,
            lot_allocations,
            wallet_amount: db.wallet_amount,
            wallet_currency: db.wallet_currency,
            note: db.note,
            created_at: db.created_at,
        })
    }
}

impl TryFrom<&InvestmentTransaction> for InvestmentTransactionDB {
    type Error = StorageError;

    fn try_from(domain: &InvestmentTransaction) -> Result<Self, Self::Error> {
        Ok(Self {
            id: domain.id.clone(),
            investment_id: domain.investment_id.clone(),
            transaction_type: domain.transaction_type.as_str().to_string(),
            quantity: domain.quantity,
            price: domain.price,
            cost: domain.cost,
            fees: domain.fees,
            realized_pnl: domain.realized_pnl,
            transaction_date: domain.transaction_date,
            lot_id: domain.lot_id.clone(),
            remaining_quantity: domain.remaining_quantity,
            lot_allocations: serde_json::to_string(&domain.lot_allocations)?,
            wallet_amount: domain.wallet_amount,
            wallet_currency: domain.wallet_currency.clone(),
            note: domain.note.clone(),
            created_at: domain.created_at,
        })
    }
}
