//! Option Contract and Snapshot Value Objects

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    /// Put option.
    Put,
    /// Call option.
    Call,
}

impl ContractType {
    /// Provider query value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Put => "put",
            Self::Call => "call",
        }
    }
}

impl std::fmt::Display for ContractType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference data for one tradable option contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Provider contract identifier (e.g., "O:AAPL261120P00140000").
    pub ticker: String,
    /// Underlying symbol.
    pub underlying_ticker: String,
    /// Strike price.
    pub strike_price: Decimal,
    /// Expiration date.
    pub expiration_date: NaiveDate,
    /// Put or call.
    pub contract_type: ContractType,
}

impl Contract {
    /// Create a new put contract.
    #[must_use]
    pub fn put(
        ticker: impl Into<String>,
        underlying_ticker: impl Into<String>,
        strike_price: Decimal,
        expiration_date: NaiveDate,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            underlying_ticker: underlying_ticker.into(),
            strike_price,
            expiration_date,
            contract_type: ContractType::Put,
        }
    }
}

/// Point-in-time quote for a contract.
///
/// Bid and ask are relayed as the provider reports them; `ask >= bid` is
/// not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Contract identifier.
    pub ticker: String,
    /// Best bid.
    pub bid: Option<Decimal>,
    /// Best ask.
    pub ask: Option<Decimal>,
    /// Session close.
    pub day_close: Option<Decimal>,
}

impl Snapshot {
    /// Placeholder for a ticker whose snapshot could not be retrieved.
    #[must_use]
    pub fn unavailable(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Self::default()
        }
    }

    /// True when no price field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bid.is_none() && self.ask.is_none() && self.day_close.is_none()
    }
}
