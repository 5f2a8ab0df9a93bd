mod common;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;

use common::{setup, OWNER};
use investfolio_core::errors::Result;
use investfolio_core::fx::{FxService, FxServiceTrait, NewExchangeRate};
use investfolio_core::market_data::{
    MarketDataProviderTrait, PriceRefreshService, PriceRefreshServiceTrait,
};
use investfolio_core::wallets::WalletRepositoryTrait;
use investfolio_core::{
    AssetType, ErrorKind, Investment, InvestmentServiceTrait, LedgerTransactionExecutor,
    NewInvestment, NewInvestmentTransaction, TransactionType,
};

const SHARE: i64 = 10_000;

fn at(day: u32, hour: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn stock(wallet_id: &str, symbol: &str, quantity: i64, cost: i64) -> NewInvestment {
    NewInvestment {
        wallet_id: wallet_id.to_string(),
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        asset_type: AssetType::Stock,
        currency: "USD".to_string(),
        quantity,
        initial_cost: cost,
        fees: 0,
        purchased_at: Some(at(1, 10)),
        note: None,
    }
}

fn trade(
    transaction_type: TransactionType,
    quantity: i64,
    price: i64,
    date: chrono::NaiveDateTime,
) -> NewInvestmentTransaction {
    NewInvestmentTransaction {
        transaction_type,
        quantity,
        price,
        fees: 0,
        transaction_date: date,
        note: None,
    }
}

#[tokio::test]
async fn test_settlement_round_trip_persists() {
    let db = setup();
    db.wallet("w-usd", "USD", 100_000).await;
    let service = db.service(Arc::new(FxService::new()));

    let created = service
        .create_investment(OWNER, stock("w-usd", "AAPL", 100 * SHARE, 15_000))
        .await
        .unwrap();
    let sold = service
        .add_transaction(
            OWNER,
            &created.investment.id,
            trade(TransactionType::Sell, 30 * SHARE, 170, at(5, 10)),
        )
        .await
        .unwrap();

    assert_eq!(sold.investment.realized_pnl, 600);
    assert_eq!(db.balance("w-usd"), 100_000 - 15_000 + 5_100);

    // Reads come back through a fresh pooled connection.
    let stored = service
        .get_investment(OWNER, &created.investment.id)
        .await
        .unwrap();
    assert_eq!(stored.quantity, 70 * SHARE);
    assert_eq!(stored.total_cost, 15_000);
    assert_eq!(stored.average_cost, 150);

    let history = service
        .list_transactions(OWNER, &created.investment.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].transaction_type, TransactionType::Sell);
    assert_eq!(history[0].lot_allocations, sold.transaction.lot_allocations);

    let reversed = service
        .delete_transaction(OWNER, &sold.transaction.id)
        .await
        .unwrap();
    assert_eq!(reversed.investment.quantity, 100 * SHARE);
    assert_eq!(reversed.investment.realized_pnl, 0);
    assert_eq!(db.balance("w-usd"), 85_000);

    let lots = service
        .get_open_lots(OWNER, &created.investment.id)
        .await
        .unwrap();
    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].remaining_quantity, 100 * SHARE);
}

#[tokio::test]
async fn test_failed_action_rolls_back_every_table() {
    let db = setup();
    db.wallet("w-usd", "USD", 100_000).await;
    let service = db.service(Arc::new(FxService::new()));

    let created = service
        .create_investment(OWNER, stock("w-usd", "AAPL", 10 * SHARE, 1_000))
        .await
        .unwrap();

    // Shrink the open lot behind the aggregate's back so the sell fails
    // after the quantity check has passed.
    let lot_id = created.transaction.lot_id.clone().unwrap();
    db.executor
        .execute(move |store| {
            let mut lot = store.get_lot(&lot_id)?;
            lot.remaining_quantity = 2 * SHARE;
            store.update_lot(&lot)
        })
        .await
        .unwrap();

    let err = service
        .add_transaction(
            OWNER,
            &created.investment.id,
            trade(TransactionType::Sell, 5 * SHARE, 120, at(2, 10)),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientResource);

    let stored = service
        .get_investment(OWNER, &created.investment.id)
        .await
        .unwrap();
    assert_eq!(stored.quantity, 10 * SHARE);
    assert_eq!(stored.realized_pnl, 0);
    let history = service
        .list_transactions(OWNER, &created.investment.id)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(db.balance("w-usd"), 99_000);
}

#[tokio::test]
async fn test_insufficient_balance_leaves_no_rows() {
    let db = setup();
    db.wallet("w-usd", "USD", 1_000).await;
    let service = db.service(Arc::new(FxService::new()));

    let err = service
        .create_investment(OWNER, stock("w-usd", "AAPL", 100 * SHARE, 15_000))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InsufficientResource);
    assert!(service
        .list_investments(OWNER, "w-usd")
        .await
        .unwrap()
        .is_empty());
    assert_eq!(db.balance("w-usd"), 1_000);
}

#[tokio::test]
async fn test_duplicate_symbol_is_a_conflict() {
    let db = setup();
    db.wallet("w-usd", "USD", 100_000).await;
    let service = db.service(Arc::new(FxService::new()));

    service
        .create_investment(OWNER, stock("w-usd", "AAPL", SHARE, 100))
        .await
        .unwrap();
    let err = service
        .create_investment(OWNER, stock("w-usd", "aapl", SHARE, 100))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_delete_investment_cascades() {
    let db = setup();
    db.wallet("w-vnd", "VND", 10_000_000).await;
    let fx = Arc::new(FxService::new());
    fx.add_exchange_rate(NewExchangeRate {
        from_currency: "USD".to_string(),
        to_currency: "VND".to_string(),
        rate: dec!(25000),
        source: "MANUAL".to_string(),
    })
    .await
    .unwrap();
    let service = db.service(fx);

    let created = service
        .create_investment(OWNER, stock("w-vnd", "AAPL", 2 * SHARE, 1_000))
        .await
        .unwrap();
    assert_eq!(db.balance("w-vnd"), 9_750_000);

    let deleted = service
        .delete_investment(OWNER, &created.investment.id)
        .await
        .unwrap();
    assert_eq!(deleted.refunded_amount, 250_000);
    assert_eq!(db.balance("w-vnd"), 10_000_000);

    let err = service
        .list_transactions(OWNER, &created.investment.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let lot_id = created.transaction.lot_id.clone().unwrap();
    let lot = db
        .executor
        .read(move |store| store.get_lot(&lot_id))
        .await;
    assert_eq!(lot.unwrap_err().kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_wallets_are_scoped_to_owner() {
    let db = setup();
    db.wallet("w-usd", "USD", 100_000).await;

    assert_eq!(db.wallets.list_for_owner(OWNER).unwrap().len(), 1);
    assert!(db.wallets.list_for_owner("someone-else").unwrap().is_empty());
    let err = db
        .wallets
        .get_for_owner("w-usd", "someone-else")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let wallet = db.wallets.adjust_balance("w-usd", -250).await.unwrap();
    assert_eq!(wallet.balance, 99_750);
}

struct FixedPrices(HashMap<String, i64>);

#[async_trait]
impl MarketDataProviderTrait for FixedPrices {
    fn id(&self) -> &str {
        "FIXED"
    }

    async fn update_prices(
        &self,
        investments: &[Investment],
        _force_refresh: bool,
    ) -> Result<HashMap<String, i64>> {
        Ok(investments
            .iter()
            .filter_map(|inv| self.0.get(&inv.symbol).map(|p| (inv.id.clone(), *p)))
            .collect())
    }
}

#[tokio::test]
async fn test_price_refresh_writes_back() {
    let db = setup();
    db.wallet("w-usd", "USD", 100_000).await;
    let service = db.service(Arc::new(FxService::new()));
    let created = service
        .create_investment(OWNER, stock("w-usd", "AAPL", 100 * SHARE, 15_000))
        .await
        .unwrap();

    let provider = FixedPrices(HashMap::from([("AAPL".to_string(), 180)]));
    let refresher = PriceRefreshService::new(db.executor.clone(), Arc::new(provider));
    refresher.spawn_refresh("w-usd", true).await.unwrap();

    let summary = service
        .get_investment_summary(OWNER, &created.investment.id)
        .await
        .unwrap();
    assert_eq!(summary.current_price, 180);
    assert_eq!(summary.market_value, 18_000);
    assert_eq!(summary.unrealized_pnl, 3_000);
    assert!(summary.price_updated_at.is_some());

    let outcomes = refresher.refresh_all(false).await.unwrap();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].updated, vec![created.investment.id.clone()]);
}
