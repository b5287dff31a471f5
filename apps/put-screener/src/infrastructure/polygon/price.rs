//! Polygon implementation of `PriceLookupPort`.
//!
//! Uses the previous session's close. Each attempt that errors or yields no
//! positive close is retried after a fixed delay.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::api_types::PreviousCloseResponse;
use super::config::{PolygonConfig, RetryConfig};
use super::error::PolygonError;
use super::http_client::PolygonHttpClient;
use crate::application::ports::{PriceLookupError, PriceLookupPort};

/// Price lookup against Polygon's previous-close aggregate.
#[derive(Debug, Clone)]
pub struct PolygonPriceLookup {
    http: PolygonHttpClient,
    retry: RetryConfig,
}

/// Why a single attempt produced no price.
enum AttemptFailure {
    NoPrice,
    Request(PolygonError),
}

impl PolygonPriceLookup {
    /// Create a new price lookup.
    ///
    /// # Errors
    ///
    /// Returns error if credentials are empty or the base URL is invalid.
    pub fn new(config: &PolygonConfig) -> Result<Self, PolygonError> {
        Ok(Self::with_client(PolygonHttpClient::new(config)?, config.retry))
    }

    /// Create a price lookup sharing an existing client.
    #[must_use]
    pub const fn with_client(http: PolygonHttpClient, retry: RetryConfig) -> Self {
        Self { http, retry }
    }

    async fn attempt(&self, symbol: &str) -> Result<Decimal, AttemptFailure> {
        let response: PreviousCloseResponse = self
            .http
            .get(
                &["v2", "aggs", "ticker", symbol, "prev"],
                &[("adjusted", "true".to_string())],
            )
            .await
            .map_err(|e| match e {
                PolygonError::NotFound { .. } => AttemptFailure::NoPrice,
                other => AttemptFailure::Request(other),
            })?;

        response
            .results
            .into_iter()
            .find_map(|bar| bar.close)
            .filter(|close| *close > Decimal::ZERO)
            .ok_or(AttemptFailure::NoPrice)
    }
}

#[async_trait]
impl PriceLookupPort for PolygonPriceLookup {
    async fn current_price(&self, symbol: &str) -> Result<Decimal, PriceLookupError> {
        let attempts = self.retry.max_attempts.max(1);
        let mut last = AttemptFailure::NoPrice;

        for attempt in 1..=attempts {
            match self.attempt(symbol).await {
                Ok(price) => return Ok(price),
                Err(failure) => {
                    match &failure {
                        AttemptFailure::NoPrice => {
                            tracing::warn!(symbol = %symbol, attempt, "No price in response");
                        }
                        AttemptFailure::Request(e) => {
                            tracing::warn!(
                                symbol = %symbol,
                                attempt,
                                error = %e,
                                "Price request failed"
                            );
                        }
                    }
                    last = failure;
                }
            }

            if attempt < attempts {
                tokio::time::sleep(self.retry.delay).await;
            }
        }

        Err(match last {
            AttemptFailure::NoPrice => PriceLookupError::NotFound {
                symbol: symbol.to_string(),
            },
            AttemptFailure::Request(e) => PriceLookupError::Unavailable {
                symbol: symbol.to_string(),
                attempts,
                message: e.to_string(),
            },
        })
    }
}
