//! Options Data Port (Driven Port)
//!
//! Interface for listing option contracts and fetching quote snapshots from
//! an options chain provider.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{Contract, ContractType, Snapshot};

/// Opaque continuation reference returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(String);

impl PageCursor {
    /// Wrap a provider continuation reference.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw continuation reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Server-side filters for contract listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractQuery {
    /// Underlying symbol.
    pub underlying: String,
    /// Contract type.
    pub contract_type: ContractType,
    /// Inclusive strike upper bound.
    pub max_strike: Option<Decimal>,
    /// Inclusive earliest expiration.
    pub expiration_from: Option<NaiveDate>,
    /// Inclusive latest expiration.
    pub expiration_to: Option<NaiveDate>,
    /// Page size.
    pub limit: u32,
}

impl ContractQuery {
    /// Unfiltered put listing for an underlying.
    #[must_use]
    pub fn puts(underlying: impl Into<String>, limit: u32) -> Self {
        Self {
            underlying: underlying.into(),
            contract_type: ContractType::Put,
            max_strike: None,
            expiration_from: None,
            expiration_to: None,
            limit,
        }
    }

    /// Narrow to strikes at or below `max_strike`.
    #[must_use]
    pub const fn with_max_strike(mut self, max_strike: Decimal) -> Self {
        self.max_strike = Some(max_strike);
        self
    }

    /// Narrow to an inclusive expiration range.
    #[must_use]
    pub const fn with_expiration_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.expiration_from = Some(from);
        self.expiration_to = Some(to);
        self
    }
}

/// One page of contracts.
#[derive(Debug, Clone, Default)]
pub struct ContractPage {
    /// Contracts in provider order.
    pub contracts: Vec<Contract>,
    /// Continuation reference, if more pages exist.
    pub next: Option<PageCursor>,
}

/// One page of chain snapshots.
#[derive(Debug, Clone, Default)]
pub struct SnapshotPage {
    /// Snapshots in provider order.
    pub snapshots: Vec<Snapshot>,
    /// Continuation reference, if more pages exist.
    pub next: Option<PageCursor>,
}

/// Provider request failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsDataError {
    /// Network or timeout failure.
    #[error("Options data connection error: {message}")]
    Connection {
        /// Error details.
        message: String,
    },

    /// Provider rejected the credential.
    #[error("Options data authentication failed")]
    AuthenticationFailed,

    /// Provider throttled the request.
    #[error("Options data rate limited")]
    RateLimited,

    /// Resource does not exist.
    #[error("Options data not found: {resource}")]
    NotFound {
        /// The missing resource.
        resource: String,
    },

    /// Non-success response.
    #[error("Options data API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error details.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("Options data parse error: {message}")]
    Parse {
        /// Error details.
        message: String,
    },
}

/// Port for an options chain provider.
#[async_trait]
pub trait OptionsDataPort: Send + Sync {
    /// Fetch one page of contracts.
    ///
    /// `cursor` is `None` for the first page and the previous page's `next`
    /// afterwards.
    async fn list_contracts(
        &self,
        query: &ContractQuery,
        cursor: Option<&PageCursor>,
    ) -> Result<ContractPage, OptionsDataError>;

    /// Fetch the snapshot for one contract.
    async fn get_snapshot(
        &self,
        underlying: &str,
        ticker: &str,
    ) -> Result<Snapshot, OptionsDataError>;

    /// Fetch one page of snapshots for the whole chain of an underlying.
    async fn list_chain_snapshots(
        &self,
        underlying: &str,
        cursor: Option<&PageCursor>,
    ) -> Result<SnapshotPage, OptionsDataError>;
}
