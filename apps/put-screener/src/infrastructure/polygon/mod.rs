//! Polygon Options Data Adapter
//!
//! REST implementation of `OptionsDataPort` and `PriceLookupPort` against
//! Polygon's v3 options and v2 aggregates APIs:
//! - Query-parameter credential, re-attached to every continuation URL
//! - Paginated contract listing and chain snapshots
//! - Per-ticker snapshots accepting both quote shapes
//! - Previous-close price lookup with fixed-delay retry

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;
mod price;

pub use adapter::PolygonOptionsAdapter;
pub use config::{ApiCredentials, DEFAULT_BASE_URL, PolygonConfig, RetryConfig};
pub use error::PolygonError;
pub use http_client::PolygonHttpClient;
pub use price::PolygonPriceLookup;
