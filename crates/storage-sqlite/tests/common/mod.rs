use std::sync::Arc;

use investfolio_core::fx::FxService;
use investfolio_core::wallets::{NewWallet, Wallet, WalletRepositoryTrait, WalletType};
use investfolio_core::InvestmentService;
use investfolio_storage_sqlite::{
    create_pool, init, run_migrations, spawn_writer, DbPool, SqliteLedgerExecutor,
    WalletRepository,
};
use tempfile::TempDir;

pub const OWNER: &str = "owner-1";

pub struct TestDb {
    // Keeps the database directory alive for the test's duration.
    _dir: TempDir,
    pub pool: Arc<DbPool>,
    pub executor: SqliteLedgerExecutor,
    pub wallets: WalletRepository,
}

pub fn setup() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("ledger.db");
    let db_path = init(db_path.to_str().expect("utf-8 path")).expect("init db");
    let pool = create_pool(&db_path).expect("create pool");
    run_migrations(&pool).expect("migrations");
    let writer = spawn_writer(&pool).expect("writer");

    TestDb {
        _dir: dir,
        executor: SqliteLedgerExecutor::new(pool.clone(), writer.clone()),
        wallets: WalletRepository::new(pool.clone(), writer),
        pool,
    }
}

impl TestDb {
    pub async fn wallet(&self, id: &str, currency: &str, balance: i64) -> Wallet {
        self.wallets
            .create(NewWallet {
                id: Some(id.to_string()),
                owner_id: OWNER.to_string(),
                name: format!("{} wallet", id),
                wallet_type: WalletType::Investment,
                currency: currency.to_string(),
                balance,
            })
            .await
            .expect("create wallet")
    }

    pub fn service(&self, fx: Arc<FxService>) -> InvestmentService<SqliteLedgerExecutor> {
        InvestmentService::new(self.executor.clone(), fx)
    }

    pub fn balance(&self, wallet_id: &str) -> i64 {
        self.wallets
            .get_for_owner(wallet_id, OWNER)
            .expect("wallet")
            .balance
    }
}
