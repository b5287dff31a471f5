//! HTTP response DTOs.
//!
//! Decimal values are written as JSON numbers.

use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::use_cases::ScreenResult;
use crate::domain::{ContractType, MergedResult, ScreeningError};

/// Message shown by the root endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Status text.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Screening response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsResponse {
    /// Underlying price, rounded to cents.
    #[serde(with = "rust_decimal::serde::float")]
    pub stock_price: Decimal,
    /// Qualifying puts.
    pub options: Vec<OptionRow>,
}

impl From<ScreenResult> for OptionsResponse {
    fn from(result: ScreenResult) -> Self {
        Self {
            stock_price: result.current_price.round_dp(2),
            options: result.options.into_iter().map(OptionRow::from).collect(),
        }
    }
}

/// A qualifying put.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionRow {
    /// Contract identifier.
    pub ticker: String,
    /// Underlying symbol.
    pub underlying_ticker: String,
    /// Strike price.
    #[serde(with = "rust_decimal::serde::float")]
    pub strike_price: Decimal,
    /// Expiration date.
    pub expiration_date: NaiveDate,
    /// Contract type.
    pub contract_type: ContractType,
    /// Derived premium.
    #[serde(with = "rust_decimal::serde::float")]
    pub premium: Decimal,
    /// Best bid.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub bid: Option<Decimal>,
    /// Best ask.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub ask: Option<Decimal>,
    /// Ask minus bid.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub spread: Option<Decimal>,
}

impl From<MergedResult> for OptionRow {
    fn from(result: MergedResult) -> Self {
        Self {
            ticker: result.ticker,
            underlying_ticker: result.underlying_ticker,
            strike_price: result.strike_price,
            expiration_date: result.expiration_date,
            contract_type: result.contract_type,
            premium: result.premium,
            bid: result.bid,
            ask: result.ask,
            spread: result.spread,
        }
    }
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Errors returned by the screening endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The symbol could not be priced.
    NoPrice,
    /// The request was malformed or out of range.
    BadRequest(String),
}

impl From<ScreeningError> for ApiError {
    fn from(err: ScreeningError) -> Self {
        match err {
            ScreeningError::NoPriceAvailable { .. } => Self::NoPrice,
            invalid @ ScreeningError::InvalidParameter { .. } => {
                Self::BadRequest(invalid.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            Self::NoPrice => (StatusCode::NOT_FOUND, "No price found for symbol".to_string()),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}
