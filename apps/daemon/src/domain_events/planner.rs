//! Decides what a debounced batch of events should trigger.

use std::collections::BTreeSet;

use investfolio_core::events::DomainEvent;

/// Wallets whose cached display values are stale after this batch.
pub fn plan_cache_invalidation(events: &[DomainEvent]) -> BTreeSet<String> {
    events.iter().map(|e| e.wallet_id().to_string()).collect()
}

/// Wallets whose prices should be refreshed. Only changed investments
/// qualify; a refresh's own `PricesRefreshed` event never triggers another.
pub fn plan_price_refresh(events: &[DomainEvent]) -> BTreeSet<String> {
    events
        .iter()
        .filter_map(|event| match event {
            DomainEvent::InvestmentsChanged { wallet_id, .. } => Some(wallet_id.clone()),
            DomainEvent::WalletBalanceChanged { .. } | DomainEvent::PricesRefreshed { .. } => {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_is_deduplicated_per_wallet() {
        let events = vec![
            DomainEvent::investments_changed("w1", vec!["a".to_string()]),
            DomainEvent::wallet_balance_changed("w1"),
            DomainEvent::investments_changed("w1", vec!["b".to_string()]),
            DomainEvent::wallet_balance_changed("w2"),
        ];

        let stale: Vec<_> = plan_cache_invalidation(&events).into_iter().collect();
        assert_eq!(stale, vec!["w1".to_string(), "w2".to_string()]);

        let refresh: Vec<_> = plan_price_refresh(&events).into_iter().collect();
        assert_eq!(refresh, vec!["w1".to_string()]);
    }

    #[test]
    fn test_price_refresh_does_not_retrigger_itself() {
        let events = vec![DomainEvent::prices_refreshed("w1", vec!["a".to_string()])];
        assert!(plan_price_refresh(&events).is_empty());
        assert_eq!(plan_cache_invalidation(&events).len(), 1);
    }
}
