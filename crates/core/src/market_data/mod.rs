//! Market data module - price providers and the out-of-band price refresh.

mod market_data_errors;
mod market_data_model;
mod market_data_traits;
mod price_refresh_service;

// Re-export the public interface
pub use market_data_errors::MarketDataError;
pub use market_data_model::PriceRefreshOutcome;
pub use market_data_traits::{MarketDataProviderTrait, PriceRefreshServiceTrait};
pub use price_refresh_service::PriceRefreshService;
