use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::aggregate;
use super::investments_errors::InvestmentError;
use super::investments_model::{
    validate_note, DeletedInvestment, Investment, InvestmentLot, InvestmentSummary,
    InvestmentTransaction, NewInvestment, NewInvestmentTransaction, SettlementReceipt,
    TransactionType,
};
use super::investments_traits::{
    InvestmentServiceTrait, InvestmentStore, LedgerTransactionExecutor,
};
use super::lot_ledger::LotLedger;
use crate::errors::{Error, ErrorKind, Result, ValidationError};
use crate::events::{DomainEvent, DomainEventSink, NoOpDomainEventSink};
use crate::fx::FxServiceTrait;
use crate::settings::SettlementSettings;
use crate::units::{self, average_cost, notional, round_to_minor_units, whole_units, UnitSpec};
use crate::wallets::Wallet;

/// Settlement orchestrator.
///
/// Every action is a single job on the executor: validation, lot and
/// aggregate updates, the transaction row and the wallet delta commit or roll
/// back together. Events go out only after commit.
pub struct InvestmentService<X: LedgerTransactionExecutor + Clone> {
    executor: X,
    fx_service: Arc<dyn FxServiceTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    settings: SettlementSettings,
}

/// What a job needs from the service, owned so it can cross into the executor.
struct SettlementContext {
    fx_service: Arc<dyn FxServiceTrait>,
    merge_window: Duration,
    deadline: Instant,
    action: &'static str,
}

impl SettlementContext {
    fn check_deadline(&self) -> Result<()> {
        if Instant::now() > self.deadline {
            return Err(Error::Timeout(format!(
                "{} did not finish before its deadline",
                self.action
            )));
        }
        Ok(())
    }

    /// Converts `amount` (smallest unit of `from`) into the wallet's currency.
    fn to_wallet_amount(&self, amount: i64, from: &str, wallet: &Wallet) -> Result<i64> {
        if from == wallet.currency {
            return Ok(amount);
        }
        let converted =
            self.fx_service
                .convert_currency(Decimal::from(amount), from, &wallet.currency)?;
        round_to_minor_units(converted)
    }

    /// Amount a reversal moves back: exactly what the transaction moved,
    /// restated only if the wallet has since changed currency.
    fn reversal_amount(&self, transaction: &InvestmentTransaction, wallet: &Wallet) -> Result<i64> {
        self.to_wallet_amount(
            transaction.wallet_amount,
            &transaction.wallet_currency,
            wallet,
        )
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn ensure_not_future(date: NaiveDateTime, now: NaiveDateTime) -> Result<()> {
    if date > now {
        return Err(InvestmentError::FutureDate(date.to_string()).into());
    }
    Ok(())
}

fn ensure_balance(wallet: &Wallet, required: i64) -> Result<()> {
    if wallet.balance < required {
        return Err(InvestmentError::InsufficientBalance {
            required,
            available: wallet.balance,
            currency: wallet.currency.clone(),
        }
        .into());
    }
    Ok(())
}

fn add(a: i64, b: i64, what: &str) -> Result<i64> {
    a.checked_add(b)
        .ok_or_else(|| InvestmentError::Overflow(what.to_string()).into())
}

/// Loads an investment and its wallet, hiding investments the owner cannot see.
fn load_owned(
    store: &mut dyn InvestmentStore,
    owner_id: &str,
    investment_id: &str,
) -> Result<(Investment, Wallet)> {
    let investment = store.get_investment(investment_id)?;
    match store.get_wallet_for_owner(&investment.wallet_id, owner_id) {
        Ok(wallet) => Ok((investment, wallet)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(InvestmentError::not_found("investment", investment_id).into())
        }
        Err(e) => Err(e),
    }
}

fn load_owned_transaction(
    store: &mut dyn InvestmentStore,
    owner_id: &str,
    transaction_id: &str,
) -> Result<(InvestmentTransaction, Investment, Wallet)> {
    let transaction = store.get_transaction(transaction_id)?;
    match load_owned(store, owner_id, &transaction.investment_id) {
        Ok((investment, wallet)) => Ok((transaction, investment, wallet)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(InvestmentError::not_found("transaction", transaction_id).into())
        }
        Err(e) => Err(e),
    }
}

fn create_investment_job(
    store: &mut dyn InvestmentStore,
    ctx: &SettlementContext,
    owner_id: &str,
    new_investment: NewInvestment,
) -> Result<SettlementReceipt> {
    let wallet = store.get_wallet_for_owner(&new_investment.wallet_id, owner_id)?;
    if !wallet.is_investment() {
        return Err(InvestmentError::WrongWalletType {
            wallet_id: wallet.id.clone(),
            wallet_type: wallet.wallet_type.to_string(),
        }
        .into());
    }

    let spec = units::resolve(new_investment.asset_type)?;
    let symbol = new_investment.normalized_symbol();
    if store
        .find_investment_by_symbol(&wallet.id, &symbol)?
        .is_some()
    {
        return Err(InvestmentError::DuplicateSymbol {
            symbol,
            wallet_id: wallet.id.clone(),
        }
        .into());
    }

    let now = now();
    let purchased_at = new_investment.purchased_at.unwrap_or(now);
    ensure_not_future(purchased_at, now)?;

    let total_cost = add(new_investment.initial_cost, new_investment.fees, "initial cost")?;
    let currency = new_investment.currency.trim().to_uppercase();
    let settlement_currency = spec.settlement_currency(&currency).to_string();
    let wallet_amount = ctx.to_wallet_amount(total_cost, &settlement_currency, &wallet)?;
    ensure_balance(&wallet, wallet_amount)?;

    let mut investment = Investment {
        id: Uuid::new_v4().to_string(),
        wallet_id: wallet.id.clone(),
        symbol,
        name: new_investment.name.trim().to_string(),
        asset_type: new_investment.asset_type,
        currency,
        created_at: now,
        updated_at: now,
        ..Default::default()
    };
    aggregate::apply_buy(&mut investment, new_investment.quantity, total_cost, spec.scale)?;
    store.insert_investment(&investment)?;

    let lot = LotLedger::new(&mut *store, ctx.merge_window).create_or_merge_buy_lot(
        &investment,
        new_investment.quantity,
        total_cost,
        purchased_at,
        spec.scale,
    )?;

    let transaction = InvestmentTransaction {
        id: Uuid::new_v4().to_string(),
        investment_id: investment.id.clone(),
        transaction_type: TransactionType::Buy,
        quantity: new_investment.quantity,
        price: average_cost(new_investment.initial_cost, new_investment.quantity, spec.scale)?,
        cost: new_investment.initial_cost,
        fees: new_investment.fees,
        realized_pnl: 0,
        transaction_date: purchased_at,
        lot_id: Some(lot.id.clone()),
        remaining_quantity: Some(lot.remaining_quantity),
        lot_allocations: Vec::new(),
        wallet_amount,
        wallet_currency: wallet.currency.clone(),
        note: new_investment.note,
        created_at: now,
    };
    store.insert_transaction(&transaction)?;

    let wallet = store.adjust_wallet_balance(&wallet.id, -wallet_amount)?;
    Ok(SettlementReceipt {
        investment,
        transaction,
        wallet,
    })
}

fn add_transaction_job(
    store: &mut dyn InvestmentStore,
    ctx: &SettlementContext,
    owner_id: &str,
    investment_id: &str,
    new_transaction: NewInvestmentTransaction,
) -> Result<SettlementReceipt> {
    let (mut investment, wallet) = load_owned(store, owner_id, investment_id)?;
    let spec = investment.unit_spec()?;
    let settlement_currency = investment.settlement_currency(&spec).to_string();

    let now = now();
    ensure_not_future(new_transaction.transaction_date, now)?;

    let NewInvestmentTransaction {
        transaction_type,
        quantity,
        price,
        fees,
        transaction_date,
        note,
    } = new_transaction;
    let gross = notional(quantity, price, spec.scale)?;

    let mut transaction = InvestmentTransaction {
        id: Uuid::new_v4().to_string(),
        investment_id: investment.id.clone(),
        transaction_type,
        quantity,
        price,
        cost: gross,
        fees,
        realized_pnl: 0,
        transaction_date,
        lot_id: None,
        remaining_quantity: None,
        lot_allocations: Vec::new(),
        wallet_amount: 0,
        wallet_currency: wallet.currency.clone(),
        note,
        created_at: now,
    };

    let wallet_delta = match transaction_type {
        TransactionType::Buy => {
            let total_cost = add(gross, fees, "buy cost")?;
            let wallet_amount = ctx.to_wallet_amount(total_cost, &settlement_currency, &wallet)?;
            ensure_balance(&wallet, wallet_amount)?;

            let lot = LotLedger::new(&mut *store, ctx.merge_window).create_or_merge_buy_lot(
                &investment,
                quantity,
                total_cost,
                transaction_date,
                spec.scale,
            )?;
            aggregate::apply_buy(&mut investment, quantity, total_cost, spec.scale)?;

            transaction.lot_id = Some(lot.id);
            transaction.remaining_quantity = Some(lot.remaining_quantity);
            transaction.wallet_amount = wallet_amount;
            -wallet_amount
        }
        TransactionType::Sell => {
            if quantity > investment.quantity {
                return Err(InvestmentError::InsufficientQuantity {
                    requested: quantity,
                    available: investment.quantity,
                }
                .into());
            }
            if fees > gross {
                return Err(ValidationError::InvalidInput(format!(
                    "Fees {} exceed sale proceeds {}",
                    fees, gross
                ))
                .into());
            }

            let allocations =
                LotLedger::new(&mut *store, ctx.merge_window).consume_fifo(&investment, quantity)?;
            let pnl = aggregate::realized_pnl(&allocations, price, fees, spec.scale)?;
            aggregate::apply_sell(&mut investment, quantity, pnl)?;

            let wallet_amount = ctx.to_wallet_amount(gross - fees, &settlement_currency, &wallet)?;
            transaction.lot_id = allocations.first().map(|a| a.lot_id.clone());
            transaction.lot_allocations = allocations;
            transaction.realized_pnl = pnl;
            transaction.wallet_amount = wallet_amount;
            wallet_amount
        }
        TransactionType::Dividend => {
            if fees > gross {
                return Err(ValidationError::InvalidInput(format!(
                    "Fees {} exceed dividend amount {}",
                    fees, gross
                ))
                .into());
            }
            aggregate::apply_dividend(&mut investment, gross)?;
            let net = gross - fees;

            let wallet_amount = ctx.to_wallet_amount(net, &settlement_currency, &wallet)?;
            transaction.wallet_amount = wallet_amount;
            wallet_amount
        }
    };

    investment.updated_at = now;
    store.update_investment(&investment)?;
    store.insert_transaction(&transaction)?;
    let wallet = store.adjust_wallet_balance(&wallet.id, wallet_delta)?;

    Ok(SettlementReceipt {
        investment,
        transaction,
        wallet,
    })
}

/// A buy can only come back out while its lot still holds the bought
/// quantity open; otherwise those units were already sold.
fn ensure_buy_reversible(
    store: &mut dyn InvestmentStore,
    transaction: &InvestmentTransaction,
    investment: &Investment,
) -> Result<()> {
    if transaction.quantity > investment.quantity {
        return Err(InvestmentError::InsufficientQuantity {
            requested: transaction.quantity,
            available: investment.quantity,
        }
        .into());
    }
    if let Some(lot_id) = transaction.lot_id.as_deref() {
        let lot = store.get_lot(lot_id)?;
        if lot.remaining_quantity < transaction.quantity {
            return Err(InvestmentError::InsufficientLots {
                requested: transaction.quantity,
                available: lot.remaining_quantity,
            }
            .into());
        }
    }
    Ok(())
}

fn delete_transaction_job(
    store: &mut dyn InvestmentStore,
    ctx: &SettlementContext,
    owner_id: &str,
    transaction_id: &str,
) -> Result<SettlementReceipt> {
    let (transaction, mut investment, wallet) =
        load_owned_transaction(store, owner_id, transaction_id)?;
    let spec = investment.unit_spec()?;
    let amount = ctx.reversal_amount(&transaction, &wallet)?;

    if transaction.transaction_type == TransactionType::Buy {
        ensure_buy_reversible(store, &transaction, &investment)?;
    }

    // The row goes first: a buy's lot may be removed below.
    store.delete_transaction(&transaction.id)?;

    let wallet_delta = match transaction.transaction_type {
        TransactionType::Buy => {
            let total_cost = add(transaction.cost, transaction.fees, "buy cost")?;
            if let Some(lot_id) = transaction.lot_id.as_deref() {
                LotLedger::new(&mut *store, ctx.merge_window).reverse_buy(
                    lot_id,
                    transaction.quantity,
                    total_cost,
                    spec.scale,
                )?;
            } else {
                warn!(
                    "Buy {} carries no lot reference; only the investment is reversed",
                    transaction.id
                );
            }
            aggregate::reverse_buy(&mut investment, transaction.quantity, total_cost, spec.scale)?;
            amount
        }
        TransactionType::Sell => {
            ensure_balance(&wallet, amount)?;
            LotLedger::new(&mut *store, ctx.merge_window)
                .reverse_sell(&transaction.lot_allocations)?;
            aggregate::reverse_sell(&mut investment, transaction.quantity, transaction.realized_pnl)?;
            -amount
        }
        TransactionType::Dividend => {
            ensure_balance(&wallet, amount)?;
            aggregate::reverse_dividend(&mut investment, transaction.cost);
            -amount
        }
    };

    investment.updated_at = now();
    store.update_investment(&investment)?;
    let wallet = if wallet_delta != 0 {
        store.adjust_wallet_balance(&wallet.id, wallet_delta)?
    } else {
        wallet
    };

    Ok(SettlementReceipt {
        investment,
        transaction,
        wallet,
    })
}

fn delete_investment_job(
    store: &mut dyn InvestmentStore,
    ctx: &SettlementContext,
    owner_id: &str,
    investment_id: &str,
) -> Result<DeletedInvestment> {
    let (investment, wallet) = load_owned(store, owner_id, investment_id)?;
    let spec = investment.unit_spec()?;
    let refunded_amount = ctx.to_wallet_amount(
        investment.total_cost,
        investment.settlement_currency(&spec),
        &wallet,
    )?;

    let transactions = store.delete_transactions_for_investment(&investment.id)?;
    let lots = store.delete_lots_for_investment(&investment.id)?;
    store.delete_investment(&investment.id)?;
    debug!(
        "Deleted investment {} with {} transaction(s) and {} lot(s)",
        investment.id, transactions, lots
    );

    let wallet = if refunded_amount != 0 {
        store.adjust_wallet_balance(&wallet.id, refunded_amount)?
    } else {
        wallet
    };

    Ok(DeletedInvestment {
        investment,
        refunded_amount,
        wallet,
    })
}

fn summarize(
    investment: &Investment,
    spec: &UnitSpec,
    open_lots: &[InvestmentLot],
) -> Result<InvestmentSummary> {
    Ok(InvestmentSummary {
        investment_id: investment.id.clone(),
        symbol: investment.symbol.clone(),
        asset_type: investment.asset_type,
        unit: spec.unit.to_string(),
        settlement_currency: investment.settlement_currency(spec).to_string(),
        quantity: investment.quantity,
        whole_units: whole_units(investment.quantity, spec.scale),
        average_cost: investment.average_cost,
        total_cost: investment.total_cost,
        current_price: investment.current_price,
        market_value: notional(investment.quantity, investment.current_price, spec.scale)?,
        unrealized_pnl: aggregate::unrealized_pnl(investment, spec.scale)?,
        realized_pnl: investment.realized_pnl,
        total_dividends: investment.total_dividends,
        open_lots: open_lots.len(),
        price_updated_at: investment.price_updated_at,
    })
}

impl<X: LedgerTransactionExecutor + Clone> InvestmentService<X> {
    pub fn new(executor: X, fx_service: Arc<dyn FxServiceTrait>) -> Self {
        Self {
            executor,
            fx_service,
            event_sink: Arc::new(NoOpDomainEventSink),
            settings: SettlementSettings::default(),
        }
    }

    /// Sets the domain event sink for this service.
    pub fn with_event_sink(mut self, event_sink: Arc<dyn DomainEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    pub fn with_settings(mut self, settings: SettlementSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &SettlementSettings {
        &self.settings
    }

    fn context(&self, action: &'static str) -> SettlementContext {
        SettlementContext {
            fx_service: self.fx_service.clone(),
            merge_window: self.settings.merge_window,
            deadline: Instant::now() + self.settings.action_timeout,
            action,
        }
    }

    async fn with_deadline<T>(
        &self,
        action: &'static str,
        future: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.settings.action_timeout, future).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "{} timed out after {:?}",
                    action, self.settings.action_timeout
                );
                Err(Error::Timeout(format!(
                    "{} exceeded {:?}",
                    action, self.settings.action_timeout
                )))
            }
        }
    }

    /// Runs a mutating job atomically. The deadline is only checked inside
    /// the job, so an action that ran late rolls back. Once the job commits
    /// the caller always waits for its reply; cutting that wait short would
    /// report a failure for an action that was applied.
    async fn run_write<F, T>(&self, action: &'static str, job: F) -> Result<T>
    where
        F: FnOnce(&mut dyn InvestmentStore, &SettlementContext) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let ctx = self.context(action);
        self.executor
            .execute(move |store| {
                ctx.check_deadline()?;
                let output = job(store, &ctx)?;
                ctx.check_deadline()?;
                Ok(output)
            })
            .await
    }

    async fn run_read<F, T>(&self, action: &'static str, job: F) -> Result<T>
    where
        F: FnOnce(&mut dyn InvestmentStore, &SettlementContext) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let ctx = self.context(action);
        let future = self.executor.read(move |store| job(store, &ctx));
        self.with_deadline(action, future).await
    }

    fn emit_settled(&self, wallet_id: &str, investment_id: &str) {
        self.event_sink.emit_batch(vec![
            DomainEvent::investments_changed(wallet_id, vec![investment_id.to_string()]),
            DomainEvent::wallet_balance_changed(wallet_id),
        ]);
    }

    fn log_rejection<T>(action: &str, result: &Result<T>) {
        if let Err(e) = result {
            match e.kind() {
                ErrorKind::Internal => log::error!("{} failed: {}", action, e),
                _ => warn!("{} rejected: {}", action, e),
            }
        }
    }
}

#[async_trait]
impl<X: LedgerTransactionExecutor + Clone + 'static> InvestmentServiceTrait
    for InvestmentService<X>
{
    async fn create_investment(
        &self,
        owner_id: &str,
        new_investment: NewInvestment,
    ) -> Result<SettlementReceipt> {
        new_investment.validate()?;
        let owner_id = owner_id.to_string();

        let result = self
            .run_write("create_investment", move |store, ctx| {
                create_investment_job(store, ctx, &owner_id, new_investment)
            })
            .await;
        Self::log_rejection("create_investment", &result);
        let receipt = result?;

        info!(
            "Created investment {} ({}) in wallet {}",
            receipt.investment.id, receipt.investment.symbol, receipt.investment.wallet_id
        );
        self.emit_settled(&receipt.investment.wallet_id, &receipt.investment.id);
        Ok(receipt)
    }

    async fn add_transaction(
        &self,
        owner_id: &str,
        investment_id: &str,
        new_transaction: NewInvestmentTransaction,
    ) -> Result<SettlementReceipt> {
        new_transaction.validate()?;
        let owner_id = owner_id.to_string();
        let investment_id = investment_id.to_string();
        let transaction_type = new_transaction.transaction_type;

        let result = self
            .run_write("add_transaction", move |store, ctx| {
                add_transaction_job(store, ctx, &owner_id, &investment_id, new_transaction)
            })
            .await;
        Self::log_rejection("add_transaction", &result);
        let receipt = result?;

        info!(
            "Recorded {} {} on investment {} (wallet delta {} {})",
            transaction_type,
            receipt.transaction.id,
            receipt.investment.id,
            receipt.transaction.wallet_amount,
            receipt.transaction.wallet_currency
        );
        self.emit_settled(&receipt.investment.wallet_id, &receipt.investment.id);
        Ok(receipt)
    }

    async fn delete_transaction(
        &self,
        owner_id: &str,
        transaction_id: &str,
    ) -> Result<SettlementReceipt> {
        let owner_id = owner_id.to_string();
        let transaction_id = transaction_id.to_string();

        let result = self
            .run_write("delete_transaction", move |store, ctx| {
                delete_transaction_job(store, ctx, &owner_id, &transaction_id)
            })
            .await;
        Self::log_rejection("delete_transaction", &result);
        let receipt = result?;

        info!(
            "Reversed {} {} on investment {}",
            receipt.transaction.transaction_type, receipt.transaction.id, receipt.investment.id
        );
        self.emit_settled(&receipt.investment.wallet_id, &receipt.investment.id);
        Ok(receipt)
    }

    async fn delete_investment(
        &self,
        owner_id: &str,
        investment_id: &str,
    ) -> Result<DeletedInvestment> {
        let owner_id = owner_id.to_string();
        let investment_id = investment_id.to_string();

        let result = self
            .run_write("delete_investment", move |store, ctx| {
                delete_investment_job(store, ctx, &owner_id, &investment_id)
            })
            .await;
        Self::log_rejection("delete_investment", &result);
        let deleted = result?;

        info!(
            "Deleted investment {} and refunded {} {}",
            deleted.investment.id, deleted.refunded_amount, deleted.wallet.currency
        );
        self.emit_settled(&deleted.investment.wallet_id, &deleted.investment.id);
        Ok(deleted)
    }

    async fn update_transaction_note(
        &self,
        owner_id: &str,
        transaction_id: &str,
        note: Option<String>,
    ) -> Result<InvestmentTransaction> {
        validate_note(note.as_deref())?;
        let owner_id = owner_id.to_string();
        let transaction_id = transaction_id.to_string();

        let (transaction, wallet_id) = self
            .run_write("update_transaction_note", move |store, _ctx| {
                let (_, investment, _) =
                    load_owned_transaction(store, &owner_id, &transaction_id)?;
                let updated = store.update_transaction_note(&transaction_id, note.as_deref())?;
                Ok((updated, investment.wallet_id))
            })
            .await?;

        self.event_sink.emit(DomainEvent::investments_changed(
            wallet_id,
            vec![transaction.investment_id.clone()],
        ));
        Ok(transaction)
    }

    async fn get_investment(&self, owner_id: &str, investment_id: &str) -> Result<Investment> {
        let owner_id = owner_id.to_string();
        let investment_id = investment_id.to_string();
        self.run_read("get_investment", move |store, _ctx| {
            load_owned(store, &owner_id, &investment_id).map(|(investment, _)| investment)
        })
        .await
    }

    async fn list_investments(&self, owner_id: &str, wallet_id: &str) -> Result<Vec<Investment>> {
        let owner_id = owner_id.to_string();
        let wallet_id = wallet_id.to_string();
        self.run_read("list_investments", move |store, _ctx| {
            let wallet = store.get_wallet_for_owner(&wallet_id, &owner_id)?;
            store.list_investments_for_wallet(&wallet.id)
        })
        .await
    }

    async fn get_open_lots(
        &self,
        owner_id: &str,
        investment_id: &str,
    ) -> Result<Vec<InvestmentLot>> {
        let owner_id = owner_id.to_string();
        let investment_id = investment_id.to_string();
        self.run_read("get_open_lots", move |store, ctx| {
            let (investment, _) = load_owned(store, &owner_id, &investment_id)?;
            LotLedger::new(store, ctx.merge_window).open_lots(&investment.id)
        })
        .await
    }

    async fn list_transactions(
        &self,
        owner_id: &str,
        investment_id: &str,
    ) -> Result<Vec<InvestmentTransaction>> {
        let owner_id = owner_id.to_string();
        let investment_id = investment_id.to_string();
        self.run_read("list_transactions", move |store, _ctx| {
            let (investment, _) = load_owned(store, &owner_id, &investment_id)?;
            store.list_transactions(&investment.id)
        })
        .await
    }

    async fn get_investment_summary(
        &self,
        owner_id: &str,
        investment_id: &str,
    ) -> Result<InvestmentSummary> {
        let owner_id = owner_id.to_string();
        let investment_id = investment_id.to_string();
        self.run_read("get_investment_summary", move |store, ctx| {
            let (investment, _) = load_owned(store, &owner_id, &investment_id)?;
            let spec = investment.unit_spec()?;
            let open_lots = LotLedger::new(store, ctx.merge_window).open_lots(&investment.id)?;
            summarize(&investment, &spec, &open_lots)
        })
        .await
    }
}
