//! Application Layer
//!
//! Orchestrates the screening pipeline.
//!
//! - `ports`: Interfaces for the options data provider, price lookup and
//!   pipeline observability
//! - `services`: Contract pagination and concurrent snapshot retrieval
//! - `use_cases`: `RetrievePuts` (the pipeline) and `ScreenSymbol`
//!   (price lookup + pipeline)

pub mod ports;
pub mod services;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;
