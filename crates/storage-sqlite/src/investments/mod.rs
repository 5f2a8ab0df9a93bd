//! SQLite storage implementation for the investment ledger.

mod executor;
mod model;
mod store;

pub use executor::SqliteLedgerExecutor;
pub use model::{InvestmentDB, InvestmentLotDB, InvestmentTransactionDB};
pub use store::SqliteInvestmentStore;
