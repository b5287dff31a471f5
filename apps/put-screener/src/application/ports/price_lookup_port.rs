//! Price Lookup Port (Driven Port)
//!
//! Resolves the current price of an underlying. Implementations own their
//! retry policy; callers receive either a positive price or an error.

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Price lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceLookupError {
    /// Provider has no price for the symbol.
    #[error("No price found for symbol: {symbol}")]
    NotFound {
        /// The unknown symbol.
        symbol: String,
    },

    /// Every attempt failed.
    #[error("Price unavailable for {symbol} after {attempts} attempts: {message}")]
    Unavailable {
        /// The symbol.
        symbol: String,
        /// Attempts made.
        attempts: u32,
        /// Last failure.
        message: String,
    },
}

/// Port for current underlying prices.
#[async_trait]
pub trait PriceLookupPort: Send + Sync {
    /// Current price of `symbol`, always positive on success.
    async fn current_price(&self, symbol: &str) -> Result<Decimal, PriceLookupError>;
}
