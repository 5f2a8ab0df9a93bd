//! In-memory ledger storage for service tests.
//!
//! The executor snapshots the whole state before a job and swaps the result
//! in only when the job succeeds, matching the SQLite executor's rollback.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::errors::{Error, Result};
use crate::investments::{
    Investment, InvestmentError, InvestmentLot, InvestmentStore, InvestmentTransaction,
    LedgerTransactionExecutor,
};
use crate::wallets::{Wallet, WalletType};

#[derive(Clone, Default)]
pub struct MemoryLedger {
    pub wallets: HashMap<String, Wallet>,
    pub investments: HashMap<String, Investment>,
    pub lots: HashMap<String, InvestmentLot>,
    pub transactions: HashMap<String, InvestmentTransaction>,
    /// Makes every wallet balance change fail, to exercise rollback.
    pub fail_wallet_updates: bool,
}

fn missing(entity: &str, id: &str) -> Error {
    InvestmentError::not_found(entity, id).into()
}

impl InvestmentStore for MemoryLedger {
    fn get_wallet_for_owner(&mut self, wallet_id: &str, owner_id: &str) -> Result<Wallet> {
        self.wallets
            .get(wallet_id)
            .filter(|w| w.owner_id == owner_id)
            .cloned()
            .ok_or_else(|| missing("wallet", wallet_id))
    }

    fn adjust_wallet_balance(&mut self, wallet_id: &str, delta: i64) -> Result<Wallet> {
        if self.fail_wallet_updates {
            return Err(Error::Unexpected("wallet storage unavailable".to_string()));
        }
        let wallet = self
            .wallets
            .get_mut(wallet_id)
            .ok_or_else(|| missing("wallet", wallet_id))?;
        wallet.balance += delta;
        Ok(wallet.clone())
    }

    fn get_investment(&mut self, investment_id: &str) -> Result<Investment> {
        self.investments
            .get(investment_id)
            .cloned()
            .ok_or_else(|| missing("investment", investment_id))
    }

    fn find_investment_by_symbol(
        &mut self,
        wallet_id: &str,
        symbol: &str,
    ) -> Result<Option<Investment>> {
        Ok(self
            .investments
            .values()
            .find(|i| i.wallet_id == wallet_id && i.symbol == symbol)
            .cloned())
    }

    fn list_investments_for_wallet(&mut self, wallet_id: &str) -> Result<Vec<Investment>> {
        let mut found: Vec<Investment> = self
            .investments
            .values()
            .filter(|i| i.wallet_id == wallet_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(found)
    }

    fn list_wallet_ids_with_investments(&mut self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self
            .investments
            .values()
            .map(|i| i.wallet_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    fn insert_investment(&mut self, investment: &Investment) -> Result<()> {
        self.investments
            .insert(investment.id.clone(), investment.clone());
        Ok(())
    }

    fn update_investment(&mut self, investment: &Investment) -> Result<()> {
        match self.investments.get_mut(&investment.id) {
            Some(existing) => {
                *existing = investment.clone();
                Ok(())
            }
            None => Err(missing("investment", &investment.id)),
        }
    }

    fn update_current_price(
        &mut self,
        investment_id: &str,
        price: i64,
        updated_at: NaiveDateTime,
    ) -> Result<()> {
        let investment = self
            .investments
            .get_mut(investment_id)
            .ok_or_else(|| missing("investment", investment_id))?;
        investment.current_price = price;
        investment.price_updated_at = Some(updated_at);
        Ok(())
    }

    fn delete_investment(&mut self, investment_id: &str) -> Result<()> {
        self.investments
            .remove(investment_id)
            .map(|_| ())
            .ok_or_else(|| missing("investment", investment_id))
    }

    fn open_lots(&mut self, investment_id: &str) -> Result<Vec<InvestmentLot>> {
        let mut lots: Vec<InvestmentLot> = self
            .lots
            .values()
            .filter(|l| l.investment_id == investment_id && l.remaining_quantity > 0)
            .cloned()
            .collect();
        lots.sort_by(|a, b| a.purchased_at.cmp(&b.purchased_at));
        Ok(lots)
    }

    fn get_lot(&mut self, lot_id: &str) -> Result<InvestmentLot> {
        self.lots
            .get(lot_id)
            .cloned()
            .ok_or_else(|| missing("lot", lot_id))
    }

    fn insert_lot(&mut self, lot: &InvestmentLot) -> Result<()> {
        self.lots.insert(lot.id.clone(), lot.clone());
        Ok(())
    }

    fn update_lot(&mut self, lot: &InvestmentLot) -> Result<()> {
        match self.lots.get_mut(&lot.id) {
            Some(existing) => {
                *existing = lot.clone();
                Ok(())
            }
            None => Err(missing("lot", &lot.id)),
        }
    }

    fn delete_lot(&mut self, lot_id: &str) -> Result<()> {
        self.lots
            .remove(lot_id)
            .map(|_| ())
            .ok_or_else(|| missing("lot", lot_id))
    }

    fn delete_lots_for_investment(&mut self, investment_id: &str) -> Result<usize> {
        let before = self.lots.len();
        self.lots.retain(|_, l| l.investment_id != investment_id);
        Ok(before - self.lots.len())
    }

    fn get_transaction(&mut self, transaction_id: &str) -> Result<InvestmentTransaction> {
        self.transactions
            .get(transaction_id)
            .cloned()
            .ok_or_else(|| missing("transaction", transaction_id))
    }

    fn list_transactions(&mut self, investment_id: &str) -> Result<Vec<InvestmentTransaction>> {
        let mut found: Vec<InvestmentTransaction> = self
            .transactions
            .values()
            .filter(|t| t.investment_id == investment_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        Ok(found)
    }

    fn insert_transaction(&mut self, transaction: &InvestmentTransaction) -> Result<()> {
        self.transactions
            .insert(transaction.id.clone(), transaction.clone());
        Ok(())
    }

    fn update_transaction_note(
        &mut self,
        transaction_id: &str,
        note: Option<&str>,
    ) -> Result<InvestmentTransaction> {
        let transaction = self
            .transactions
            .get_mut(transaction_id)
            .ok_or_else(|| missing("transaction", transaction_id))?;
        transaction.note = note.map(str::to_string);
        Ok(transaction.clone())
    }

    fn delete_transaction(&mut self, transaction_id: &str) -> Result<()> {
        self.transactions
            .remove(transaction_id)
            .map(|_| ())
            .ok_or_else(|| missing("transaction", transaction_id))
    }

    fn delete_transactions_for_investment(&mut self, investment_id: &str) -> Result<usize> {
        let before = self.transactions.len();
        self.transactions
            .retain(|_, t| t.investment_id != investment_id);
        Ok(before - self.transactions.len())
    }
}

/// Snapshot-on-begin, commit-on-success executor over [`MemoryLedger`].
#[derive(Clone, Default)]
pub struct MemoryLedgerExecutor {
    state: Arc<Mutex<MemoryLedger>>,
}

impl MemoryLedgerExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_wallet(
        &self,
        id: &str,
        owner_id: &str,
        wallet_type: WalletType,
        currency: &str,
        balance: i64,
    ) {
        let now = Utc::now().naive_utc();
        self.with_state(|state| {
            state.wallets.insert(
                id.to_string(),
                Wallet {
                    id: id.to_string(),
                    owner_id: owner_id.to_string(),
                    name: format!("{} wallet", id),
                    wallet_type,
                    currency: currency.to_string(),
                    balance,
                    created_at: now,
                    updated_at: now,
                },
            );
        });
    }

    pub fn snapshot(&self) -> MemoryLedger {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut MemoryLedger) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn wallet_balance(&self, wallet_id: &str) -> i64 {
        self.snapshot()
            .wallets
            .get(wallet_id)
            .map(|w| w.balance)
            .unwrap_or_default()
    }
}

#[async_trait]
impl LedgerTransactionExecutor for MemoryLedgerExecutor {
    async fn execute<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut dyn InvestmentStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut working = guard.clone();
        let output = job(&mut working)?;
        *guard = working;
        Ok(output)
    }
}
