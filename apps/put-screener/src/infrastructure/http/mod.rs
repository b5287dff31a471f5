//! HTTP/REST API adapter.
//!
//! Inbound adapter exposing the screener and operational endpoints.

mod controller;
mod request;
mod response;

pub use controller::{AppState, create_router};
pub use request::OptionsQuery;
pub use response::{
    ApiError, ErrorResponse, HealthResponse, MessageResponse, OptionRow, OptionsResponse,
};
