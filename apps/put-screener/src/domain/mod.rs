//! Domain Layer
//!
//! Pure, synchronous screening logic with no infrastructure dependencies.
//!
//! - [`contract`]: Option contract metadata and quote snapshots
//! - [`premium`]: Premium and bid-ask spread derivation
//! - [`screening`]: Expiry/strike filtering, merge and quality thresholds

pub mod contract;
pub mod premium;
pub mod screening;

pub use contract::{Contract, ContractType, Snapshot};
pub use premium::PremiumRecord;
pub use screening::{
    EXPIRY_TOLERANCE_DAYS, ExpiryStrikeFilter, MergedResult, QualityThresholds, ScreeningError,
    ScreeningInputs, ScreeningParams, merge,
};
