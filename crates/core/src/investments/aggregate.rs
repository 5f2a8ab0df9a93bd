//! Pure recomputation of an investment's rolled-up state.
//!
//! A sell never touches `total_cost` or `average_cost`; the cost basis
//! survives even when quantity reaches zero.

use rust_decimal::Decimal;

use super::investments_errors::InvestmentError;
use super::investments_model::{Investment, LotAllocation};
use crate::errors::Result;
use crate::units::{average_cost, round_to_minor_units};

fn checked(value: Option<i64>, what: &str) -> Result<i64> {
    value.ok_or_else(|| InvestmentError::Overflow(what.to_string()).into())
}

pub fn apply_buy(inv: &mut Investment, quantity: i64, total_cost: i64, scale: i64) -> Result<()> {
    let quantity_after = checked(inv.quantity.checked_add(quantity), "investment quantity")?;
    let total_after = checked(inv.total_cost.checked_add(total_cost), "investment total cost")?;
    inv.average_cost = average_cost(total_after, quantity_after, scale)?;
    inv.quantity = quantity_after;
    inv.total_cost = total_after;
    Ok(())
}

pub fn apply_sell(inv: &mut Investment, quantity: i64, realized_delta: i64) -> Result<()> {
    if quantity > inv.quantity {
        return Err(InvestmentError::InsufficientQuantity {
            requested: quantity,
            available: inv.quantity,
        }
        .into());
    }
    inv.realized_pnl = checked(inv.realized_pnl.checked_add(realized_delta), "realized PNL")?;
    inv.quantity -= quantity;
    Ok(())
}

pub fn apply_dividend(inv: &mut Investment, amount: i64) -> Result<()> {
    inv.total_dividends = checked(inv.total_dividends.checked_add(amount), "total dividends")?;
    Ok(())
}

/// Undoes a buy. Cost basis is floored at zero; average cost is recomputed
/// from what is left.
pub fn reverse_buy(inv: &mut Investment, quantity: i64, total_cost: i64, scale: i64) -> Result<()> {
    if quantity > inv.quantity {
        return Err(InvestmentError::InsufficientQuantity {
            requested: quantity,
            available: inv.quantity,
        }
        .into());
    }
    inv.quantity -= quantity;
    inv.total_cost = (inv.total_cost - total_cost).max(0);
    inv.average_cost = average_cost(inv.total_cost, inv.quantity, scale)?;
    Ok(())
}

/// Undoes a sell using the PNL recorded when it was booked.
pub fn reverse_sell(inv: &mut Investment, quantity: i64, realized_pnl: i64) -> Result<()> {
    inv.quantity = checked(inv.quantity.checked_add(quantity), "investment quantity")?;
    inv.realized_pnl = checked(inv.realized_pnl.checked_sub(realized_pnl), "realized PNL")?;
    Ok(())
}

pub fn reverse_dividend(inv: &mut Investment, amount: i64) {
    inv.total_dividends = (inv.total_dividends - amount).max(0);
}

/// Realized PNL of a sell: for each consumed portion
/// `(sell_price - lot_average_cost) * quantity / scale`, summed unrounded,
/// rounded once, then reduced by `fees`.
pub fn realized_pnl(
    portions: &[LotAllocation],
    sell_price: i64,
    fees: i64,
    scale: i64,
) -> Result<i64> {
    let scale = Decimal::from(scale);
    let mut gross = Decimal::ZERO;
    for portion in portions {
        let per_unit = Decimal::from(sell_price) - Decimal::from(portion.lot_average_cost);
        let whole_units = Decimal::from(portion.quantity) / scale;
        gross = per_unit
            .checked_mul(whole_units)
            .and_then(|pnl| gross.checked_add(pnl))
            .ok_or_else(|| InvestmentError::Overflow("realized PNL".to_string()))?;
    }
    let rounded = round_to_minor_units(gross)?;
    checked(rounded.checked_sub(fees), "realized PNL")
}

/// `(current_price - average_cost) * whole units`, rounded.
pub fn unrealized_pnl(inv: &Investment, scale: i64) -> Result<i64> {
    let per_unit = Decimal::from(inv.current_price) - Decimal::from(inv.average_cost);
    let whole_units = Decimal::from(inv.quantity) / Decimal::from(scale);
    let value = per_unit
        .checked_mul(whole_units)
        .ok_or_else(|| InvestmentError::Overflow("unrealized PNL".to_string()))?;
    round_to_minor_units(value)
}
