use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use investfolio_core::errors::Result;
use investfolio_core::wallets::Wallet;
use investfolio_core::{
    Investment, InvestmentError, InvestmentLot, InvestmentStore, InvestmentTransaction,
};

use super::model::{InvestmentDB, InvestmentLotDB, InvestmentTransactionDB};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{investment_lots, investment_transactions, investments};
use crate::wallets::{adjust_balance_in, get_for_owner_in};

/// [`InvestmentStore`] over one connection that is already inside a
/// transaction. Nothing here commits.
pub struct SqliteInvestmentStore<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> SqliteInvestmentStore<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }
}

fn ensure_affected(rows: usize, entity: &str, id: &str) -> Result<()> {
    if rows == 0 {
        return Err(InvestmentError::not_found(entity, id).into());
    }
    Ok(())
}

fn to_domain(rows: Vec<InvestmentTransactionDB>) -> Result<Vec<InvestmentTransaction>> {
    rows.into_iter()
        .map(|row| InvestmentTransaction::try_from(row).map_err(Into::into))
        .collect()
}

impl InvestmentStore for SqliteInvestmentStore<'_> {
    fn get_wallet_for_owner(&mut self, wallet_id: &str, owner_id: &str) -> Result<Wallet> {
        get_for_owner_in(self.conn, wallet_id, owner_id)
    }

    fn adjust_wallet_balance(&mut self, wallet_id: &str, delta: i64) -> Result<Wallet> {
        adjust_balance_in(self.conn, wallet_id, delta)
    }

    fn get_investment(&mut self, investment_id: &str) -> Result<Investment> {
        investments::table
            .find(investment_id)
            .select(InvestmentDB::as_select())
            .first::<InvestmentDB>(self.conn)
            .optional()
            .into_core()?
            .map(Investment::from)
            .ok_or_else(|| InvestmentError::not_found("investment", investment_id).into())
    }

    fn find_investment_by_symbol(
        &mut self,
        wallet_id: &str,
        symbol: &str,
    ) -> Result<Option<Investment>> {
        let found = investments::table
            .filter(investments::wallet_id.eq(wallet_id))
            .filter(investments::symbol.eq(symbol))
            .select(InvestmentDB::as_select())
            .first::<InvestmentDB>(self.conn)
            .optional()
            .into_core()?;
        Ok(found.map(Investment::from))
    }

    fn list_investments_for_wallet(&mut self, wallet_id: &str) -> Result<Vec<Investment>> {
        let rows = investments::table
            .filter(investments::wallet_id.eq(wallet_id))
            .select(InvestmentDB::as_select())
            .order(investments::symbol.asc())
            .load::<InvestmentDB>(self.conn)
            .into_core()?;
        Ok(rows.into_iter().map(Investment::from).collect())
    }

    fn list_wallet_ids_with_investments(&mut self) -> Result<Vec<String>> {
        investments::table
            .select(investments::wallet_id)
            .distinct()
            .order(investments::wallet_id.asc())
            .load::<String>(self.conn)
            .into_core()
    }

    fn insert_investment(&mut self, investment: &Investment) -> Result<()> {
        diesel::insert_into(investments::table)
            .values(InvestmentDB::from(investment))
            .execute(self.conn)
            .into_core()?;
        Ok(())
    }

    fn update_investment(&mut self, investment: &Investment) -> Result<()> {
        let rows = diesel::update(investments::table.find(&investment.id))
            .set(&InvestmentDB::from(investment))
            .execute(self.conn)
            .into_core()?;
        ensure_affected(rows, "investment", &investment.id)
    }

    fn update_current_price(
        &mut self,
        investment_id: &str,
        price: i64,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        let rows = diesel::update(investments::table.find(investment_id))
            .set((
                investments::current_price.eq(price),
                investments::price_updated_at.eq(Some(updated_at)),
            ))
            .execute(self.conn)
            .into_core()?;
        ensure_affected(rows, "investment", investment_id)
    }

    fn delete_investment(&mut self, investment_id: &str) -> Result<()> {
        let rows = diesel::delete(investments::table.find(investment_id))
            .execute(self.conn)
            .into_core()?;
        ensure_affected(rows, "investment", investment_id)
    }

    fn open_lots(&mut self, investment_id: &str) -> Result<Vec<InvestmentLot>> {
        let rows = investment_lots::table
            .filter(investment_lots::investment_id.eq(investment_id))
            .filter(investment_lots::remaining_quantity.gt(0))
            .select(InvestmentLotDB::as_select())
            .order((
                investment_lots::purchased_at.asc(),
                investment_lots::created_at.asc(),
            ))
            .load::<InvestmentLotDB>(self.conn)
            .into_core()?;
        Ok(rows.into_iter().map(InvestmentLot::from).collect())
    }

    fn get_lot(&mut self, lot_id: &str) -> Result<InvestmentLot> {
        investment_lots::table
            .find(lot_id)
            .select(InvestmentLotDB::as_select())
            .first::<InvestmentLotDB>(self.conn)
            .optional()
            .into_core()?
            .map(InvestmentLot::from)
            .ok_or_else(|| InvestmentError::not_found("lot", lot_id).into())
    }

    fn insert_lot(&mut self, lot: &InvestmentLot) -> Result<()> {
        diesel::insert_into(investment_lots::table)
            .values(InvestmentLotDB::from(lot))
            .execute(self.conn)
            .into_core()?;
        Ok(())
    }

    fn update_lot(&mut self, lot: &InvestmentLot) -> Result<()> {
        let rows = diesel::update(investment_lots::table.find(&lot.id))
            .set(&InvestmentLotDB::from(lot))
            .execute(self.conn)
            .into_core()?;
        ensure_affected(rows, "lot", &lot.id)
    }

    fn delete_lot(&mut self, lot_id: &str) -> Result<()> {
        let rows = diesel::delete(investment_lots::table.find(lot_id))
            .execute(self.conn)
            .into_core()?;
        ensure_affected(rows, "lot", lot_id)
    }

    fn delete_lots_for_investment(&mut self, investment_id: &str) -> Result<usize> {
        diesel::delete(
            investment_lots::table.filter(investment_lots::investment_id.eq(investment_id)),
        )
        .execute(self.conn)
        .into_core()
    }

    fn get_transaction(&mut self, transaction_id: &str) -> Result<InvestmentTransaction> {
        let row = investment_transactions::table
            .find(transaction_id)
            .select(InvestmentTransactionDB::as_select())
            .first::<InvestmentTransactionDB>(self.conn)
            .optional()
            .into_core()?
            .ok_or_else(|| InvestmentError::not_found("transaction", transaction_id))?;
        Ok(InvestmentTransaction::try_from(row)?)
    }

    fn list_transactions(&mut self, investment_id: &str) -> Result<Vec<InvestmentTransaction>> {
        let rows = investment_transactions::table
            .filter(investment_transactions::investment_id.eq(investment_id))
            .select(InvestmentTransactionDB::as_select())
            .order((
                investment_transactions::transaction_date.desc(),
                investment_transactions::created_at.desc(),
            ))
            .load::<InvestmentTransactionDB>(self.conn)
            .into_core()?;
        to_domain(rows)
    }

    fn insert_transaction(&mut self, transaction: &InvestmentTransaction) -> Result<()> {
        let row = InvestmentTransactionDB::try_from(transaction).map_err(StorageError::from)?;
        diesel::insert_into(investment_transactions::table)
            .values(&row)
            .execute(self.conn)
            .into_core()?;
        Ok(())
    }

    fn update_transaction_note(
        &mut self,
        transaction_id: &str,
        note: Option<&str>,
    ) -> Result<InvestmentTransaction> {
        let rows = diesel::update(investment_transactions::table.find(transaction_id))
            .set(investment_transactions::note.eq(note))
            .execute(self.conn)
            .into_core()?;
        ensure_affected(rows, "transaction", transaction_id)?;
        self.get_transaction(transaction_id)
    }

    fn delete_transaction(&mut self, transaction_id: &str) -> Result<()> {
        let rows = diesel::delete(investment_transactions::table.find(transaction_id))
            .execute(self.conn)
            .into_core()?;
        ensure_affected(rows, "transaction", transaction_id)
    }

    fn delete_transactions_for_investment(&mut self, investment_id: &str) -> Result<usize> {
        diesel::delete(
            investment_transactions::table
                .filter(investment_transactions::investment_id.eq(investment_id)),
        )
        .execute(self.conn)
        .into_core()
    }
}
