use async_trait::async_trait;
use diesel::connection::Connection;
use std::sync::Arc;

use investfolio_core::errors::{Error, Result};
use investfolio_core::{InvestmentStore, LedgerTransactionExecutor};

use super::store::SqliteInvestmentStore;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;

/// Runs ledger jobs against SQLite.
///
/// Writes go through the single-writer actor, one IMMEDIATE transaction per
/// job, so actions never interleave. Reads use a pooled connection inside a
/// deferred transaction for a consistent snapshot.
#[derive(Clone)]
pub struct SqliteLedgerExecutor {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SqliteLedgerExecutor {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl LedgerTransactionExecutor for SqliteLedgerExecutor {
    async fn execute<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut dyn InvestmentStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.writer
            .exec(move |conn| {
                let mut store = SqliteInvestmentStore::new(conn);
                job(&mut store)
            })
            .await
    }

    async fn read<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut dyn InvestmentStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, StorageError, _>(|c| {
            let mut store = SqliteInvestmentStore::new(c);
            job(&mut store).map_err(StorageError::from)
        })
        .map_err(Error::from)
    }
}
