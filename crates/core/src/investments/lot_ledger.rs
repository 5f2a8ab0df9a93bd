//! Lot ledger - creation, merging and FIFO consumption of cost lots.

use chrono::{Duration, NaiveDateTime, Utc};
use log::debug;
use uuid::Uuid;

use super::investments_errors::InvestmentError;
use super::investments_model::{Investment, InvestmentLot, LotAllocation};
use super::investments_traits::InvestmentStore;
use crate::errors::Result;
use crate::units::average_cost;

/// Whether a buy dated `purchased_at` folds into `lot`.
///
/// Back-dated buys never merge, so FIFO order by `purchased_at` holds.
pub fn within_merge_window(
    lot: &InvestmentLot,
    purchased_at: NaiveDateTime,
    merge_window: Duration,
) -> bool {
    let gap = purchased_at - lot.purchased_at;
    gap >= Duration::zero() && gap < merge_window
}

/// Plans which open lots a sell of `quantity` consumes, oldest first.
///
/// `lots` must already be in FIFO order. Fails without side effects when the
/// open quantity falls short.
pub fn plan_fifo(lots: &[InvestmentLot], quantity: i64) -> Result<Vec<LotAllocation>> {
    let available: i64 = lots.iter().map(|lot| lot.remaining_quantity.max(0)).sum();
    if quantity > available {
        return Err(InvestmentError::InsufficientLots {
            requested: quantity,
            available,
        }
        .into());
    }

    let mut outstanding = quantity;
    let mut portions = Vec::new();
    for lot in lots.iter().filter(|lot| lot.is_open()) {
        if outstanding == 0 {
            break;
        }
        let take = lot.remaining_quantity.min(outstanding);
        portions.push(LotAllocation {
            lot_id: lot.id.clone(),
            quantity: take,
            lot_average_cost: lot.average_cost,
        });
        outstanding -= take;
    }
    Ok(portions)
}

/// Store-backed lot operations for one unit of work.
pub struct LotLedger<'a> {
    store: &'a mut dyn InvestmentStore,
    merge_window: Duration,
}

impl<'a> LotLedger<'a> {
    pub fn new(store: &'a mut dyn InvestmentStore, merge_window: Duration) -> Self {
        Self {
            store,
            merge_window,
        }
    }

    /// Open lots in FIFO order (`purchased_at`, then creation order).
    pub fn open_lots(&mut self, investment_id: &str) -> Result<Vec<InvestmentLot>> {
        let mut lots = self.store.open_lots(investment_id)?;
        lots.retain(InvestmentLot::is_open);
        lots.sort_by(|a, b| {
            a.purchased_at
                .cmp(&b.purchased_at)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(lots)
    }

    /// Grows the most recently created open lot when the buy falls inside the
    /// merge window, otherwise opens a new lot.
    pub fn create_or_merge_buy_lot(
        &mut self,
        investment: &Investment,
        quantity: i64,
        total_cost: i64,
        purchased_at: NaiveDateTime,
        scale: i64,
    ) -> Result<InvestmentLot> {
        let now = Utc::now().naive_utc();
        let latest = self
            .open_lots(&investment.id)?
            .into_iter()
            .max_by_key(|lot| lot.created_at);

        if let Some(mut lot) =
            latest.filter(|lot| within_merge_window(lot, purchased_at, self.merge_window))
        {
            lot.quantity = lot
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| InvestmentError::Overflow("lot quantity".to_string()))?;
            lot.remaining_quantity += quantity;
            lot.total_cost = lot
                .total_cost
                .checked_add(total_cost)
                .ok_or_else(|| InvestmentError::Overflow("lot total cost".to_string()))?;
            lot.average_cost = average_cost(lot.total_cost, lot.quantity, scale)?;
            lot.updated_at = now;
            self.store.update_lot(&lot)?;
            debug!(
                "Merged buy of {} into lot {} of investment {}",
                quantity, lot.id, investment.id
            );
            return Ok(lot);
        }

        let lot = InvestmentLot {
            id: Uuid::new_v4().to_string(),
            investment_id: investment.id.clone(),
            quantity,
            remaining_quantity: quantity,
            average_cost: average_cost(total_cost, quantity, scale)?,
            total_cost,
            purchased_at,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_lot(&lot)?;
        debug!("Opened lot {} for investment {}", lot.id, investment.id);
        Ok(lot)
    }

    /// Consumes `quantity` from open lots, oldest first. All or nothing.
    pub fn consume_fifo(
        &mut self,
        investment: &Investment,
        quantity: i64,
    ) -> Result<Vec<LotAllocation>> {
        let lots = self.open_lots(&investment.id)?;
        let portions = plan_fifo(&lots, quantity)?;

        let now = Utc::now().naive_utc();
        for portion in &portions {
            if let Some(lot) = lots.iter().find(|lot| lot.id == portion.lot_id) {
                let mut lot = lot.clone();
                lot.remaining_quantity -= portion.quantity;
                lot.updated_at = now;
                self.store.update_lot(&lot)?;
            }
        }
        debug!(
            "Consumed {} from {} lot(s) of investment {}",
            quantity,
            portions.len(),
            investment.id
        );
        Ok(portions)
    }

    /// Takes a buy back out of its lot. The lot must still hold the bought
    /// quantity open. A lot that was never sold from and ends up empty is
    /// removed; returns the lot if it survives.
    pub fn reverse_buy(
        &mut self,
        lot_id: &str,
        quantity: i64,
        total_cost: i64,
        scale: i64,
    ) -> Result<Option<InvestmentLot>> {
        let mut lot = self.store.get_lot(lot_id)?;
        if lot.remaining_quantity < quantity {
            return Err(InvestmentError::InsufficientLots {
                requested: quantity,
                available: lot.remaining_quantity,
            }
            .into());
        }
        let untouched = lot.remaining_quantity == lot.quantity;

        lot.quantity = (lot.quantity - quantity).max(0);
        lot.total_cost = (lot.total_cost - total_cost).max(0);
        lot.remaining_quantity -= quantity;
        lot.average_cost = average_cost(lot.total_cost, lot.quantity, scale)?;
        lot.updated_at = Utc::now().naive_utc();

        if untouched && lot.quantity == 0 {
            self.store.delete_lot(&lot.id)?;
            debug!("Removed emptied lot {}", lot.id);
            return Ok(None);
        }
        self.store.update_lot(&lot)?;
        Ok(Some(lot))
    }

    /// Puts sold quantity back into the lots it was taken from. Fails before
    /// writing anything if a lot would reopen above its size.
    pub fn reverse_sell(&mut self, allocations: &[LotAllocation]) -> Result<()> {
        let mut restored_lots = Vec::with_capacity(allocations.len());
        for allocation in allocations {
            let mut lot = self.store.get_lot(&allocation.lot_id)?;
            let restored = lot
                .remaining_quantity
                .checked_add(allocation.quantity)
                .ok_or_else(|| InvestmentError::Overflow("lot remaining quantity".to_string()))?;
            if restored > lot.quantity {
                return Err(InvestmentError::LotOverfilled {
                    lot_id: lot.id,
                    restored,
                    size: lot.quantity,
                }
                .into());
            }
            lot.remaining_quantity = restored;
            restored_lots.push(lot);
        }

        let now = Utc::now().naive_utc();
        for mut lot in restored_lots {
            lot.updated_at = now;
            self.store.update_lot(&lot)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryLedger;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn lot(id: &str, remaining: i64, cost: i64, purchased_at: NaiveDateTime) -> InvestmentLot {
        InvestmentLot {
            id: id.to_string(),
            investment_id: "inv".to_string(),
            quantity: remaining,
            remaining_quantity: remaining,
            average_cost: cost,
            total_cost: 0,
            purchased_at,
            created_at: purchased_at,
            updated_at: purchased_at,
        }
    }

    #[test]
    fn test_merge_window_boundaries() {
        let base = lot("a", 10, 1, at(1, 9));
        let window = Duration::hours(24);
        assert!(within_merge_window(&base, at(1, 10), window));
        assert!(within_merge_window(&base, at(1, 9), window));
        assert!(!within_merge_window(&base, at(2, 9), window));
        assert!(!within_merge_window(&base, at(2, 10), window));
        // Back-dated
        assert!(!within_merge_window(&base, at(1, 8), window));
    }

    #[test]
    fn test_plan_fifo_walks_oldest_first() {
        let lots = vec![
            lot("a", 100, 150, at(1, 9)),
            lot("b", 50, 160, at(3, 9)),
            lot("c", 70, 170, at(5, 9)),
        ];
        let plan = plan_fifo(&lots, 120).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].lot_id, "a");
        assert_eq!(plan[0].quantity, 100);
        assert_eq!(plan[0].lot_average_cost, 150);
        assert_eq!(plan[1].lot_id, "b");
        assert_eq!(plan[1].quantity, 20);
        assert_eq!(plan.iter().map(|p| p.quantity).sum::<i64>(), 120);
    }

    #[test]
    fn test_plan_fifo_skips_closed_lots() {
        let mut closed = lot("a", 100, 150, at(1, 9));
        closed.remaining_quantity = 0;
        let lots = vec![closed, lot("b", 50, 160, at(3, 9))];
        let plan = plan_fifo(&lots, 50).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].lot_id, "b");
    }

    #[test]
    fn test_plan_fifo_insufficient() {
        let lots = vec![lot("a", 10, 1, at(1, 9)), lot("b", 5, 1, at(2, 9))];
        let err = plan_fifo(&lots, 16).unwrap_err();
        match err {
            crate::Error::Investment(InvestmentError::InsufficientLots {
                requested,
                available,
            }) => {
                assert_eq!(requested, 16);
                assert_eq!(available, 15);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn ledger_with(lots: Vec<InvestmentLot>) -> MemoryLedger {
        let mut ledger = MemoryLedger::default();
        for lot in lots {
            ledger.lots.insert(lot.id.clone(), lot);
        }
        ledger
    }

    #[test]
    fn test_reverse_buy_needs_open_quantity_in_its_lot() {
        let mut sold_down = lot("a", 100, 150, at(1, 9));
        sold_down.remaining_quantity = 0;
        let mut ledger = ledger_with(vec![sold_down.clone()]);

        let err = LotLedger::new(&mut ledger, Duration::hours(24))
            .reverse_buy("a", 100, 15_000, 1)
            .unwrap_err();
        match err {
            crate::Error::Investment(InvestmentError::InsufficientLots {
                requested,
                available,
            }) => {
                assert_eq!(requested, 100);
                assert_eq!(available, 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(ledger.lots["a"], sold_down);
    }

    #[test]
    fn test_reverse_buy_shrinks_merged_lot() {
        let mut merged = lot("a", 150, 150, at(1, 9));
        merged.total_cost = 22_500;
        merged.remaining_quantity = 120;
        let mut ledger = ledger_with(vec![merged]);

        let survived = LotLedger::new(&mut ledger, Duration::hours(24))
            .reverse_buy("a", 50, 7_500, 1)
            .unwrap()
            .unwrap();
        assert_eq!(survived.quantity, 100);
        assert_eq!(survived.remaining_quantity, 70);
        assert_eq!(survived.total_cost, 15_000);
        assert_eq!(survived.average_cost, 150);
    }

    #[test]
    fn test_reverse_sell_rejects_overfilling_a_lot() {
        let mut partly_sold = lot("a", 100, 150, at(1, 9));
        partly_sold.remaining_quantity = 60;
        let mut full = lot("b", 50, 160, at(3, 9));
        full.remaining_quantity = 50;
        let mut ledger = ledger_with(vec![partly_sold, full]);

        let allocations = vec![
            LotAllocation {
                lot_id: "a".to_string(),
                quantity: 40,
                lot_average_cost: 150,
            },
            LotAllocation {
                lot_id: "b".to_string(),
                quantity: 10,
                lot_average_cost: 160,
            },
        ];
        let err = LotLedger::new(&mut ledger, Duration::hours(24))
            .reverse_sell(&allocations)
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Internal);
        match err {
            crate::Error::Investment(InvestmentError::LotOverfilled {
                lot_id,
                restored,
                size,
            }) => {
                assert_eq!(lot_id, "b");
                assert_eq!(restored, 60);
                assert_eq!(size, 50);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // Nothing written, not even the lot that fit.
        assert_eq!(ledger.lots["a"].remaining_quantity, 60);
        assert_eq!(ledger.lots["b"].remaining_quantity, 50);
    }
}
