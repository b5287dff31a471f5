//! HTTP request DTOs.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::application::use_cases::ScreenSymbolRequest;

/// Query parameters of `GET /api/options/{symbol}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OptionsQuery {
    /// Strike band width below the current price, in percent.
    #[serde(default = "default_upper_bound")]
    pub upper_bound: Decimal,
    /// Target days to expiry.
    #[serde(default = "default_expiry")]
    pub expiry: i64,
    /// Smallest acceptable premium.
    #[serde(default = "default_min_commission")]
    pub min_commission: Decimal,
    /// Widest acceptable spread.
    #[serde(default = "default_max_spread")]
    pub max_spread: Decimal,
}

const fn default_upper_bound() -> Decimal {
    Decimal::from_parts(8, 0, 0, false, 0)
}

const fn default_expiry() -> i64 {
    30
}

const fn default_min_commission() -> Decimal {
    Decimal::ONE
}

const fn default_max_spread() -> Decimal {
    Decimal::from_parts(5, 0, 0, false, 1)
}

impl Default for OptionsQuery {
    fn default() -> Self {
        Self {
            upper_bound: default_upper_bound(),
            expiry: default_expiry(),
            min_commission: default_min_commission(),
            max_spread: default_max_spread(),
        }
    }
}

impl OptionsQuery {
    /// Build the use case request for `symbol`.
    #[must_use]
    pub fn into_request(self, symbol: String) -> ScreenSymbolRequest {
        ScreenSymbolRequest {
            symbol,
            upper_bound_strike_pct: self.upper_bound,
            expiry_days: self.expiry,
            min_commission: self.min_commission,
            max_spread: self.max_spread,
            as_of: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn defaults() {
        let query = OptionsQuery::default();
        assert_eq!(query.upper_bound, dec!(8));
        assert_eq!(query.expiry, 30);
        assert_eq!(query.min_commission, dec!(1.0));
        assert_eq!(query.max_spread, dec!(0.5));
    }

    #[test]
    fn into_request_carries_values() {
        let request = OptionsQuery {
            upper_bound: dec!(10),
            expiry: 45,
            min_commission: dec!(0.75),
            max_spread: dec!(0.25),
        }
        .into_request("msft".to_string());

        assert_eq!(request.symbol, "msft");
        assert_eq!(request.upper_bound_strike_pct, dec!(10));
        assert_eq!(request.expiry_days, 45);
        assert!(request.as_of.is_none());
    }
}
