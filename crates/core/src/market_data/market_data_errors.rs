use thiserror::Error;

/// Errors raised by price providers.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider has no quote for the symbol.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// A quote that cannot be stored (zero, negative or out of range).
    #[error("Invalid price for {symbol}: {price}")]
    InvalidPrice { symbol: String, price: String },

    /// The provider's source could not be read or parsed.
    #[error("Provider error: {provider} - {message}")]
    ProviderError { provider: String, message: String },
}

impl MarketDataError {
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}
