//! Premium Derivation
//!
//! Turns a quote snapshot into a usable premium and bid-ask spread.
//!
//! | bid | ask | close | premium         | spread      |
//! |-----|-----|-------|-----------------|-------------|
//! | ✓   | ✓   | any   | `(bid + ask)/2` | `ask - bid` |
//! | any | any | ✓     | `close`         | absent      |
//! | ✓   | ✗   | ✗     | `bid`           | absent      |
//! | ✗   | any | ✗     | absent          | absent      |
//!
//! A two-sided quote whose midpoint or spread overflows is left unpriced.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::contract::Snapshot;

/// Premium and spread derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumRecord {
    /// Contract identifier.
    pub ticker: String,
    /// Tradable premium estimate; absent means unusable.
    pub premium: Option<Decimal>,
    /// Best bid.
    pub bid: Option<Decimal>,
    /// Best ask.
    pub ask: Option<Decimal>,
    /// Ask minus bid, only when both sides are quoted.
    pub spread: Option<Decimal>,
}

impl PremiumRecord {
    /// Derive premium and spread from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let (premium, spread) = match (snapshot.bid, snapshot.ask, snapshot.day_close) {
            (Some(bid), Some(ask), _) => match (bid.checked_add(ask), ask.checked_sub(bid)) {
                (Some(sum), Some(spread)) => (Some(sum / Decimal::TWO), Some(spread)),
                _ => (None, None),
            },
            (_, _, Some(close)) => (Some(close), None),
            (Some(bid), None, None) => (Some(bid), None),
            (None, _, None) => (None, None),
        };

        Self {
            ticker: snapshot.ticker.clone(),
            premium,
            bid: snapshot.bid,
            ask: snapshot.ask,
            spread,
        }
    }

    /// Whether this record carries a premium.
    #[must_use]
    pub const fn is_priced(&self) -> bool {
        self.premium.is_some()
    }
}

impl From<&Snapshot> for PremiumRecord {
    fn from(snapshot: &Snapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}
