//! Polygon API response types.
//!
//! These types map directly to Polygon's REST API format. Prices arrive as
//! JSON numbers and are read into `Decimal` through their shortest decimal
//! representation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{Contract, ContractType, Snapshot};

// ============================================================================
// Reference Data
// ============================================================================

/// Contracts listing response.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractsResponse {
    /// Contracts on this page.
    #[serde(default)]
    pub results: Vec<ContractItem>,
    /// Continuation URL.
    #[serde(default)]
    pub next_url: Option<String>,
}

/// A listed contract.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractItem {
    /// Contract ticker.
    pub ticker: String,
    /// Underlying symbol.
    #[serde(default)]
    pub underlying_ticker: Option<String>,
    /// Strike price.
    #[serde(with = "rust_decimal::serde::float")]
    pub strike_price: Decimal,
    /// Expiration date (YYYY-MM-DD).
    pub expiration_date: NaiveDate,
    /// "put" or "call".
    pub contract_type: String,
}

impl ContractItem {
    /// Convert to a domain contract; unknown contract types are skipped.
    pub fn into_contract(self, underlying: &str) -> Option<Contract> {
        let contract_type = match self.contract_type.to_lowercase().as_str() {
            "put" => ContractType::Put,
            "call" => ContractType::Call,
            _ => return None,
        };

        Some(Contract {
            ticker: self.ticker,
            underlying_ticker: self
                .underlying_ticker
                .unwrap_or_else(|| underlying.to_string()),
            strike_price: self.strike_price,
            expiration_date: self.expiration_date,
            contract_type,
        })
    }
}

// ============================================================================
// Snapshots
// ============================================================================

/// Single-contract snapshot response.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotResponse {
    /// The snapshot, absent when the provider has nothing for the contract.
    #[serde(default)]
    pub results: Option<SnapshotItem>,
}

/// Chain snapshot response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainSnapshotResponse {
    /// Snapshots on this page.
    #[serde(default)]
    pub results: Vec<SnapshotItem>,
    /// Continuation URL.
    #[serde(default)]
    pub next_url: Option<String>,
}

/// Snapshot of one contract.
///
/// Quotes are read from `last_quote` when present, otherwise from the
/// top-level `bid`/`ask`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotItem {
    /// Ticker at item level.
    #[serde(default)]
    pub ticker: Option<String>,
    /// Contract details.
    #[serde(default)]
    pub details: Option<SnapshotDetails>,
    /// Latest quote.
    #[serde(default)]
    pub last_quote: Option<QuoteItem>,
    /// Top-level best bid.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub bid: Option<Decimal>,
    /// Top-level best ask.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub ask: Option<Decimal>,
    /// Session bar.
    #[serde(default)]
    pub day: Option<DayBar>,
}

/// Snapshot contract details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotDetails {
    /// Contract ticker.
    #[serde(default)]
    pub ticker: Option<String>,
}

/// Latest quote.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteItem {
    /// Best bid.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub bid: Option<Decimal>,
    /// Best ask.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub ask: Option<Decimal>,
}

/// Session bar.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DayBar {
    /// Session close.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub close: Option<Decimal>,
}

impl SnapshotItem {
    /// Ticker from `details`, falling back to the item level.
    pub fn ticker(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.ticker.as_deref())
            .or(self.ticker.as_deref())
    }

    /// Convert to a domain snapshot for `ticker`.
    pub fn into_snapshot(self, ticker: String) -> Snapshot {
        let (quote_bid, quote_ask) = self
            .last_quote
            .map_or((None, None), |q| (q.bid, q.ask));

        Snapshot {
            ticker,
            bid: quote_bid.or(self.bid),
            ask: quote_ask.or(self.ask),
            day_close: self.day.and_then(|d| d.close),
        }
    }
}

// ============================================================================
// Aggregates
// ============================================================================

/// Previous-close aggregate response.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviousCloseResponse {
    /// Bars, normally one.
    #[serde(default)]
    pub results: Vec<AggregateBar>,
}

/// One aggregate bar.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregateBar {
    /// Close price.
    #[serde(rename = "c", default, with = "rust_decimal::serde::float_option")]
    pub close: Option<Decimal>,
}

// ============================================================================
// Errors
// ============================================================================

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolygonErrorResponse {
    /// Error text.
    #[serde(default)]
    pub error: Option<String>,
    /// Alternate error text.
    #[serde(default)]
    pub message: Option<String>,
}

impl PolygonErrorResponse {
    /// Best available message.
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}
