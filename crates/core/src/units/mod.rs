//! Units module - asset classes and their fixed-point precision.

mod units_model;
mod units_resolver;

pub use units_model::{AssetType, UnitSpec};
pub use units_resolver::{
    average_cost, notional, resolve, round_to_minor_units, to_fixed, whole_units, UNIT_TABLE,
};
