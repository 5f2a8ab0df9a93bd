//! FX (Foreign Exchange) module - rate table and minor-unit conversion.

pub mod currency;
mod fx_errors;
mod fx_model;
mod fx_service;
mod fx_traits;

pub use currency::{minor_unit_exponent, minor_unit_factor};
pub use fx_errors::FxError;
pub use fx_model::{ExchangeRate, NewExchangeRate};
pub use fx_service::FxService;
pub use fx_traits::FxServiceTrait;
