//! Application Services
//!
//! Network-facing stages of the pipeline.

mod contract_lister;
mod pagination;
mod snapshot_fetcher;

pub use contract_lister::{ContractLister, ContractListing};
pub use pagination::{Page, paginate};
pub use snapshot_fetcher::{
    DEFAULT_SNAPSHOT_CONCURRENCY, SnapshotFailure, SnapshotFetch, SnapshotFetcher,
    SnapshotStrategy,
};
