//! Investments module - positions, FIFO lots, the transaction log and the
//! settlement service that keeps them in step with wallet cash.

pub mod aggregate;
mod investments_constants;
mod investments_errors;
mod investments_model;
mod investments_service;
mod investments_traits;
pub mod lot_ledger;


pub use investments_constants::*;
pub use investments_errors::InvestmentError;
pub use investments_model::{
    ActionResponse, DeletedInvestment, Investment, InvestmentLot, InvestmentSummary,
    InvestmentTransaction, LotAllocation, NewInvestment, NewInvestmentTransaction,
    SettlementReceipt, TransactionType,
};
pub use investments_service::InvestmentService;
pub use investments_traits::{InvestmentServiceTrait, InvestmentStore, LedgerTransactionExecutor};
pub use lot_ledger::LotLedger;
