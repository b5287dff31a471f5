//! Screening Rules
//!
//! Stateless stages applied around the network fan-out:
//!
//! 1. [`ExpiryStrikeFilter`] narrows listed contracts to the expiry window and
//!    strike band, then fixes the output order.
//! 2. [`merge`] inner-joins contracts with priced premium records by ticker.
//! 3. [`QualityThresholds`] drops thin or wide markets.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::contract::{Contract, ContractType};
use super::premium::PremiumRecord;

/// Half-width of the expiry window around the target expiry.
pub const EXPIRY_TOLERANCE_DAYS: u64 = 15;

/// Errors surfaced to callers of a screening request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScreeningError {
    /// The underlying could not be priced.
    #[error("No price available for symbol: {symbol}")]
    NoPriceAvailable {
        /// The unpriceable symbol.
        symbol: String,
    },

    /// A request parameter was out of range.
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl ScreeningError {
    fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Request-supplied inputs, validated before the underlying is priced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningInputs {
    symbol: String,
    upper_bound_strike_pct: Decimal,
    expiry_days: u32,
    min_commission: Decimal,
    max_spread: Decimal,
    as_of: NaiveDate,
}

impl ScreeningInputs {
    /// Validate request inputs, dated today (UTC).
    ///
    /// # Errors
    ///
    /// Returns `ScreeningError::InvalidParameter` when a value is out of range.
    pub fn new(
        symbol: &str,
        upper_bound_strike_pct: Decimal,
        expiry_days: i64,
        min_commission: Decimal,
        max_spread: Decimal,
    ) -> Result<Self, ScreeningError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ScreeningError::invalid("symbol", "must not be empty"));
        }
        if upper_bound_strike_pct <= Decimal::ZERO || upper_bound_strike_pct > Decimal::ONE_HUNDRED
        {
            return Err(ScreeningError::invalid("upper_bound", "must be in (0, 100]"));
        }
        let expiry_days = u32::try_from(expiry_days)
            .map_err(|_| ScreeningError::invalid("expiry", "must be a non-negative day count"))?;
        if min_commission < Decimal::ZERO {
            return Err(ScreeningError::invalid("min_commission", "must not be negative"));
        }
        if max_spread < Decimal::ZERO {
            return Err(ScreeningError::invalid("max_spread", "must not be negative"));
        }

        Ok(Self {
            symbol,
            upper_bound_strike_pct,
            expiry_days,
            min_commission,
            max_spread,
            as_of: Utc::now().date_naive(),
        })
    }

    /// Override the reference date used to compute the target expiry.
    #[must_use]
    pub const fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }

    /// Normalized (upper-case) underlying symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Anchor the inputs on the resolved underlying price.
    ///
    /// # Errors
    ///
    /// Returns `ScreeningError::InvalidParameter` when the price is not positive.
    pub fn with_current_price(
        self,
        current_price: Decimal,
    ) -> Result<ScreeningParams, ScreeningError> {
        if current_price <= Decimal::ZERO {
            return Err(ScreeningError::invalid("current_price", "must be positive"));
        }

        Ok(ScreeningParams {
            symbol: self.symbol,
            upper_bound_strike_pct: self.upper_bound_strike_pct,
            current_price,
            expiry_days: self.expiry_days,
            min_commission: self.min_commission,
            max_spread: self.max_spread,
            as_of: self.as_of,
        })
    }
}

/// Validated inputs of one screening run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningParams {
    symbol: String,
    upper_bound_strike_pct: Decimal,
    current_price: Decimal,
    expiry_days: u32,
    min_commission: Decimal,
    max_spread: Decimal,
    as_of: NaiveDate,
}

impl ScreeningParams {
    /// Validate and build screening parameters dated today (UTC).
    ///
    /// # Errors
    ///
    /// Returns `ScreeningError::InvalidParameter` when a value is out of range.
    pub fn new(
        symbol: &str,
        upper_bound_strike_pct: Decimal,
        current_price: Decimal,
        expiry_days: i64,
        min_commission: Decimal,
        max_spread: Decimal,
    ) -> Result<Self, ScreeningError> {
        ScreeningInputs::new(
            symbol,
            upper_bound_strike_pct,
            expiry_days,
            min_commission,
            max_spread,
        )?
        .with_current_price(current_price)
    }

    /// Override the reference date used to compute the target expiry.
    #[must_use]
    pub const fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = as_of;
        self
    }

    /// Normalized (upper-case) underlying symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Strike band width below the current price, in percent.
    #[must_use]
    pub const fn upper_bound_strike_pct(&self) -> Decimal {
        self.upper_bound_strike_pct
    }

    /// Current underlying price.
    #[must_use]
    pub const fn current_price(&self) -> Decimal {
        self.current_price
    }

    /// Target days to expiry.
    #[must_use]
    pub const fn expiry_days(&self) -> u32 {
        self.expiry_days
    }

    /// Reference date.
    #[must_use]
    pub const fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Quality thresholds for this run.
    #[must_use]
    pub const fn thresholds(&self) -> QualityThresholds {
        QualityThresholds::new(self.min_commission, self.max_spread)
    }
}

/// Expiry window and strike band filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryStrikeFilter {
    current_price: Decimal,
    lower_strike: Decimal,
    min_expiry: NaiveDate,
    max_expiry: NaiveDate,
}

impl ExpiryStrikeFilter {
    /// Build the filter for a screening run.
    #[must_use]
    pub fn new(params: &ScreeningParams) -> Self {
        let tolerance = Days::new(EXPIRY_TOLERANCE_DAYS);
        let target = params
            .as_of
            .checked_add_days(Days::new(u64::from(params.expiry_days)))
            .unwrap_or(NaiveDate::MAX);

        let lower_strike = params.current_price
            * (Decimal::ONE - params.upper_bound_strike_pct / Decimal::ONE_HUNDRED);

        Self {
            current_price: params.current_price,
            lower_strike,
            min_expiry: target.checked_sub_days(tolerance).unwrap_or(NaiveDate::MIN),
            max_expiry: target.checked_add_days(tolerance).unwrap_or(NaiveDate::MAX),
        }
    }

    /// Lowest admissible strike (inclusive).
    #[must_use]
    pub const fn lower_strike(&self) -> Decimal {
        self.lower_strike
    }

    /// Strikes must be strictly below this price.
    #[must_use]
    pub const fn current_price(&self) -> Decimal {
        self.current_price
    }

    /// Inclusive expiry window.
    #[must_use]
    pub const fn expiry_window(&self) -> (NaiveDate, NaiveDate) {
        (self.min_expiry, self.max_expiry)
    }

    /// Whether a single contract falls inside the window and band.
    #[must_use]
    pub fn matches(&self, contract: &Contract) -> bool {
        contract.contract_type == ContractType::Put
            && contract.expiration_date >= self.min_expiry
            && contract.expiration_date <= self.max_expiry
            && contract.strike_price >= self.lower_strike
            && contract.strike_price < self.current_price
    }

    /// Filter, de-duplicate by ticker and sort by expiry ascending then
    /// strike descending.
    #[must_use]
    pub fn apply(&self, contracts: Vec<Contract>) -> Vec<Contract> {
        let mut seen = HashSet::new();
        let mut kept: Vec<Contract> = contracts
            .into_iter()
            .filter(|c| self.matches(c))
            .filter(|c| seen.insert(c.ticker.clone()))
            .collect();

        kept.sort_by(compare_expiry_then_strike_desc);
        kept
    }
}

fn compare_expiry_then_strike_desc(a: &Contract, b: &Contract) -> Ordering {
    a.expiration_date
        .cmp(&b.expiration_date)
        .then_with(|| b.strike_price.cmp(&a.strike_price))
}

/// A contract joined with its priced quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedResult {
    /// Contract identifier.
    pub ticker: String,
    /// Underlying symbol.
    pub underlying_ticker: String,
    /// Strike price.
    pub strike_price: Decimal,
    /// Expiration date.
    pub expiration_date: NaiveDate,
    /// Put or call.
    pub contract_type: ContractType,
    /// Derived premium.
    pub premium: Decimal,
    /// Best bid.
    pub bid: Option<Decimal>,
    /// Best ask.
    pub ask: Option<Decimal>,
    /// Ask minus bid when both are quoted.
    pub spread: Option<Decimal>,
}

/// Inner-join contracts with premium records on ticker.
///
/// Output follows `contracts` order. Tickers present on only one side and
/// records without a premium are dropped. When a ticker has several records
/// the first one wins.
#[must_use]
pub fn merge(
    contracts: &[Contract],
    premiums: impl IntoIterator<Item = PremiumRecord>,
) -> Vec<MergedResult> {
    let mut by_ticker: HashMap<String, PremiumRecord> = HashMap::new();
    for record in premiums {
        by_ticker.entry(record.ticker.clone()).or_insert(record);
    }

    contracts
        .iter()
        .filter_map(|contract| {
            let record = by_ticker.remove(&contract.ticker)?;
            let premium = record.premium?;
            Some(MergedResult {
                ticker: contract.ticker.clone(),
                underlying_ticker: contract.underlying_ticker.clone(),
                strike_price: contract.strike_price,
                expiration_date: contract.expiration_date,
                contract_type: contract.contract_type,
                premium,
                bid: record.bid,
                ask: record.ask,
                spread: record.spread,
            })
        })
        .collect()
}

/// Minimum premium and maximum spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityThresholds {
    /// Smallest acceptable premium (inclusive).
    pub min_commission: Decimal,
    /// Widest acceptable spread (inclusive).
    pub max_spread: Decimal,
}

impl QualityThresholds {
    /// Create thresholds.
    #[must_use]
    pub const fn new(min_commission: Decimal, max_spread: Decimal) -> Self {
        Self {
            min_commission,
            max_spread,
        }
    }

    /// A missing spread passes.
    #[must_use]
    pub fn accepts(&self, result: &MergedResult) -> bool {
        result.premium >= self.min_commission
            && result.spread.is_none_or(|spread| spread <= self.max_spread)
    }

    /// Keep accepted results, preserving order.
    #[must_use]
    pub fn apply(&self, mut results: Vec<MergedResult>) -> Vec<MergedResult> {
        results.retain(|r| self.accepts(r));
        results
    }
}
