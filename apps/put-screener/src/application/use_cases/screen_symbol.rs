//! Screen Symbol Use Case
//!
//! Resolves the underlying price, then runs the put pipeline anchored on it.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::RetrievePutsUseCase;
use crate::application::ports::{OptionsDataPort, PipelineObserver, PriceLookupPort};
use crate::domain::{MergedResult, ScreeningError, ScreeningInputs};

/// Caller-supplied screening request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSymbolRequest {
    /// Underlying symbol, any case.
    pub symbol: String,
    /// Strike band width below the current price, in percent.
    pub upper_bound_strike_pct: Decimal,
    /// Target days to expiry.
    pub expiry_days: i64,
    /// Smallest acceptable premium.
    pub min_commission: Decimal,
    /// Widest acceptable spread.
    pub max_spread: Decimal,
    /// Reference date, today (UTC) when absent.
    pub as_of: Option<NaiveDate>,
}

/// Screening outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenResult {
    /// Normalized symbol.
    pub symbol: String,
    /// Price the strike band was anchored on.
    pub current_price: Decimal,
    /// Qualifying puts, ordered by expiry then strike descending.
    pub options: Vec<MergedResult>,
}

/// Use case for screening one symbol end to end.
pub struct ScreenSymbolUseCase<P, L, O>
where
    P: OptionsDataPort + 'static,
    L: PriceLookupPort,
    O: PipelineObserver,
{
    prices: Arc<L>,
    pipeline: RetrievePutsUseCase<P, O>,
}

impl<P, L, O> ScreenSymbolUseCase<P, L, O>
where
    P: OptionsDataPort + 'static,
    L: PriceLookupPort,
    O: PipelineObserver,
{
    /// Create a new ScreenSymbolUseCase.
    pub const fn new(prices: Arc<L>, pipeline: RetrievePutsUseCase<P, O>) -> Self {
        Self { prices, pipeline }
    }

    /// Execute the use case.
    ///
    /// # Errors
    ///
    /// Returns `ScreeningError::InvalidParameter` for out-of-range inputs,
    /// before any price lookup, and `ScreeningError::NoPriceAvailable` when
    /// the lookup gives up.
    pub async fn execute(
        &self,
        request: ScreenSymbolRequest,
    ) -> Result<ScreenResult, ScreeningError> {
        let mut inputs = ScreeningInputs::new(
            &request.symbol,
            request.upper_bound_strike_pct,
            request.expiry_days,
            request.min_commission,
            request.max_spread,
        )?;
        if let Some(as_of) = request.as_of {
            inputs = inputs.with_as_of(as_of);
        }
        let symbol = inputs.symbol().to_string();

        let current_price = match self.prices.current_price(&symbol).await {
            Ok(price) => price,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Price lookup failed");
                return Err(ScreeningError::NoPriceAvailable { symbol });
            }
        };

        let params = inputs.with_current_price(current_price)?;
        let options = self.pipeline.retrieve_puts(&params).await;
        tracing::info!(
            symbol = %symbol,
            current_price = %current_price,
            results = options.len(),
            "Screening complete"
        );

        Ok(ScreenResult {
            symbol,
            current_price,
            options,
        })
    }
}
