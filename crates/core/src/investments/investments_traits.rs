use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::investments_model::{
    DeletedInvestment, Investment, InvestmentLot, InvestmentSummary, InvestmentTransaction,
    NewInvestment, NewInvestmentTransaction, SettlementReceipt,
};
use crate::errors::Result;
use crate::wallets::Wallet;

/// Storage seen from inside one atomic unit of work.
///
/// Every call made through one `&mut dyn InvestmentStore` belongs to the same
/// transaction; nothing is visible to other actions until the job returns `Ok`.
/// Missing rows surface as `InvestmentError::NotFound`.
pub trait InvestmentStore {
    /// Wallet `wallet_id` if `owner_id` owns it.
    fn get_wallet_for_owner(&mut self, wallet_id: &str, owner_id: &str) -> Result<Wallet>;

    /// Adds a signed `delta` (wallet currency) to the balance.
    fn adjust_wallet_balance(&mut self, wallet_id: &str, delta: i64) -> Result<Wallet>;

    fn get_investment(&mut self, investment_id: &str) -> Result<Investment>;
    fn find_investment_by_symbol(
        &mut self,
        wallet_id: &str,
        symbol: &str,
    ) -> Result<Option<Investment>>;
    fn list_investments_for_wallet(&mut self, wallet_id: &str) -> Result<Vec<Investment>>;
    fn list_wallet_ids_with_investments(&mut self) -> Result<Vec<String>>;
    fn insert_investment(&mut self, investment: &Investment) -> Result<()>;
    fn update_investment(&mut self, investment: &Investment) -> Result<()>;
    fn update_current_price(
        &mut self,
        investment_id: &str,
        price: i64,
        updated_at: NaiveDateTime,
    ) -> Result<()>;
    fn delete_investment(&mut self, investment_id: &str) -> Result<()>;

    /// Lots with `remaining_quantity > 0`, oldest `purchased_at` first.
    fn open_lots(&mut self, investment_id: &str) -> Result<Vec<InvestmentLot>>;
    fn get_lot(&mut self, lot_id: &str) -> Result<InvestmentLot>;
    fn insert_lot(&mut self, lot: &InvestmentLot) -> Result<()>;
    fn update_lot(&mut self, lot: &InvestmentLot) -> Result<()>;
    fn delete_lot(&mut self, lot_id: &str) -> Result<()>;
    fn delete_lots_for_investment(&mut self, investment_id: &str) -> Result<usize>;

    fn get_transaction(&mut self, transaction_id: &str) -> Result<InvestmentTransaction>;
    /// Newest `transaction_date` first.
    fn list_transactions(&mut self, investment_id: &str) -> Result<Vec<InvestmentTransaction>>;
    fn insert_transaction(&mut self, transaction: &InvestmentTransaction) -> Result<()>;
    fn update_transaction_note(
        &mut self,
        transaction_id: &str,
        note: Option<&str>,
    ) -> Result<InvestmentTransaction>;
    fn delete_transaction(&mut self, transaction_id: &str) -> Result<()>;
    fn delete_transactions_for_investment(&mut self, investment_id: &str) -> Result<usize>;
}

/// Runs a job against [`InvestmentStore`] as one atomic unit of work.
///
/// `execute` commits when the job returns `Ok` and discards every write
/// otherwise. Jobs run one at a time.
#[async_trait]
pub trait LedgerTransactionExecutor: Send + Sync {
    async fn execute<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut dyn InvestmentStore) -> Result<T> + Send + 'static,
        T: Send + 'static;

    /// Read-only job. Implementations may serve it off the write path.
    async fn read<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut dyn InvestmentStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.execute(job).await
    }
}

/// Settlement operations. Every call is scoped to `owner_id`; rows the owner
/// cannot see are reported as not found.
#[async_trait]
pub trait InvestmentServiceTrait: Send + Sync {
    async fn create_investment(
        &self,
        owner_id: &str,
        new_investment: NewInvestment,
    ) -> Result<SettlementReceipt>;

    async fn add_transaction(
        &self,
        owner_id: &str,
        investment_id: &str,
        new_transaction: NewInvestmentTransaction,
    ) -> Result<SettlementReceipt>;

    async fn delete_transaction(
        &self,
        owner_id: &str,
        transaction_id: &str,
    ) -> Result<SettlementReceipt>;

    async fn delete_investment(
        &self,
        owner_id: &str,
        investment_id: &str,
    ) -> Result<DeletedInvestment>;

    async fn update_transaction_note(
        &self,
        owner_id: &str,
        transaction_id: &str,
        note: Option<String>,
    ) -> Result<InvestmentTransaction>;

    async fn get_investment(&self, owner_id: &str, investment_id: &str) -> Result<Investment>;

    async fn list_investments(&self, owner_id: &str, wallet_id: &str) -> Result<Vec<Investment>>;

    async fn get_open_lots(&self, owner_id: &str, investment_id: &str)
        -> Result<Vec<InvestmentLot>>;

    async fn list_transactions(
        &self,
        owner_id: &str,
        investment_id: &str,
    ) -> Result<Vec<InvestmentTransaction>>;

    async fn get_investment_summary(
        &self,
        owner_id: &str,
        investment_id: &str,
    ) -> Result<InvestmentSummary>;
}
