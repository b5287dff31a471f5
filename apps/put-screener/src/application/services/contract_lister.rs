//! Contract Lister
//!
//! Walks every page of the provider's contract listing for a query. A failed
//! page ends the walk; contracts from earlier pages are kept.

use std::pin::pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};

use super::pagination::paginate;
use crate::application::ports::{ContractQuery, OptionsDataError, OptionsDataPort, PageCursor};
use crate::domain::Contract;

/// Result of a full listing walk.
#[derive(Debug, Clone, Default)]
pub struct ContractListing {
    /// Contracts from every page, in provider order.
    pub contracts: Vec<Contract>,
    /// Pages successfully fetched.
    pub pages: usize,
    /// The failure that ended pagination early, if any.
    pub interrupted: Option<OptionsDataError>,
}

/// Paginated contract discovery.
pub struct ContractLister<P: OptionsDataPort> {
    port: Arc<P>,
}

impl<P: OptionsDataPort> ContractLister<P> {
    /// Create a lister over a provider.
    pub const fn new(port: Arc<P>) -> Self {
        Self { port }
    }

    /// Lazy stream of contract pages for `query`, starting from the first page.
    pub fn pages<'a>(
        &'a self,
        query: &'a ContractQuery,
    ) -> impl Stream<Item = Result<Vec<Contract>, OptionsDataError>> + 'a {
        let port = self.port.as_ref();
        paginate(move |cursor: Option<PageCursor>| async move {
            port.list_contracts(query, cursor.as_ref()).await
        })
    }

    /// Collect every page until the listing is exhausted or a page fails.
    pub async fn list_all(&self, query: &ContractQuery) -> ContractListing {
        let mut listing = ContractListing::default();
        let mut pages = pin!(self.pages(query));

        while let Some(page) = pages.next().await {
            match page {
                Ok(contracts) => {
                    listing.pages += 1;
                    listing.contracts.extend(contracts);
                }
                Err(e) => {
                    tracing::warn!(
                        underlying = %query.underlying,
                        pages = listing.pages,
                        error = %e,
                        "Contract listing interrupted, keeping partial results"
                    );
                    listing.interrupted = Some(e);
                    break;
                }
            }
        }

        listing
    }
}
