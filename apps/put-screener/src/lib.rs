#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Put Screener - Options Chain Retrieval Service
//!
//! Answers "which puts near the current price, expiring near a target date,
//! clear minimum-premium and maximum-spread thresholds?" over a third-party
//! options chain provider.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Pure screening rules
//!   - `contract`: Contracts and quote snapshots
//!   - `premium`: Premium and spread derivation
//!   - `screening`: Expiry/strike filter, merge, quality thresholds
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Options data, price lookup and pipeline observer interfaces
//!   - `services`: Lazy pagination and bounded snapshot fan-out
//!   - `use_cases`: `RetrievePuts` and `ScreenSymbol`
//!
//! - **Infrastructure**: Adapters and process concerns
//!   - `polygon`: REST adapter for contracts, snapshots and prices
//!   - `http`: Axum REST API
//!   - `config`, `telemetry`, `metrics`
//!
//! # Data Flow
//!
//! ```text
//! symbol ─► price lookup ─► list contracts ─► expiry/strike filter
//!                                                   │
//!            results ◄─ quality ◄─ merge ◄─ premiums ◄─ snapshots (≤ N in flight)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Screening rules with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::{
    Contract, ContractType, MergedResult, PremiumRecord, QualityThresholds, ScreeningError,
    ScreeningParams, Snapshot,
};

// Use cases
pub use application::use_cases::{
    RetrievePutsConfig, RetrievePutsUseCase, ScreenResult, ScreenSymbolRequest,
    ScreenSymbolUseCase,
};

// Infrastructure config
pub use infrastructure::config::{ConfigError, ScreenerConfig};
pub use infrastructure::metrics::init_metrics;
