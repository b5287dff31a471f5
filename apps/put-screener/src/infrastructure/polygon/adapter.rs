//! Polygon implementation of `OptionsDataPort`.

use async_trait::async_trait;

use super::api_types::{ChainSnapshotResponse, ContractsResponse, SnapshotResponse};
use super::config::PolygonConfig;
use super::error::PolygonError;
use super::http_client::PolygonHttpClient;
use crate::application::ports::{
    ContractPage, ContractQuery, OptionsDataError, OptionsDataPort, PageCursor, SnapshotPage,
};
use crate::domain::Snapshot;

/// Chain snapshot page size (provider maximum).
const CHAIN_SNAPSHOT_PAGE_LIMIT: u32 = 250;

/// Options data adapter for Polygon.
#[derive(Debug, Clone)]
pub struct PolygonOptionsAdapter {
    http: PolygonHttpClient,
}

impl PolygonOptionsAdapter {
    /// Create a new adapter.
    ///
    /// # Errors
    ///
    /// Returns error if credentials are empty or the base URL is invalid.
    pub fn new(config: &PolygonConfig) -> Result<Self, PolygonError> {
        Ok(Self {
            http: PolygonHttpClient::new(config)?,
        })
    }

    /// Create an adapter sharing an existing client.
    #[must_use]
    pub const fn with_client(http: PolygonHttpClient) -> Self {
        Self { http }
    }

    fn contract_params(query: &ContractQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("underlying_ticker", query.underlying.clone()),
            ("contract_type", query.contract_type.as_str().to_string()),
        ];
        if let Some(max_strike) = query.max_strike {
            params.push(("strike_price.lte", max_strike.normalize().to_string()));
        }
        if let Some(from) = query.expiration_from {
            params.push(("expiration_date.gte", from.to_string()));
        }
        if let Some(to) = query.expiration_to {
            params.push(("expiration_date.lte", to.to_string()));
        }
        params.push(("limit", query.limit.to_string()));
        params
    }
}

#[async_trait]
impl OptionsDataPort for PolygonOptionsAdapter {
    async fn list_contracts(
        &self,
        query: &ContractQuery,
        cursor: Option<&PageCursor>,
    ) -> Result<ContractPage, OptionsDataError> {
        let response: ContractsResponse = match cursor {
            Some(cursor) => self.http.get_next(cursor.as_str()).await?,
            None => {
                self.http
                    .get(
                        &["v3", "reference", "options", "contracts"],
                        &Self::contract_params(query),
                    )
                    .await?
            }
        };

        let contracts = response
            .results
            .into_iter()
            .filter_map(|item| item.into_contract(&query.underlying))
            .collect();

        Ok(ContractPage {
            contracts,
            next: response.next_url.map(PageCursor::new),
        })
    }

    async fn get_snapshot(
        &self,
        underlying: &str,
        ticker: &str,
    ) -> Result<Snapshot, OptionsDataError> {
        let response: SnapshotResponse = self
            .http
            .get(&["v3", "snapshot", "options", underlying, ticker], &[])
            .await?;

        Ok(response.results.map_or_else(
            || Snapshot::unavailable(ticker),
            |item| item.into_snapshot(ticker.to_string()),
        ))
    }

    async fn list_chain_snapshots(
        &self,
        underlying: &str,
        cursor: Option<&PageCursor>,
    ) -> Result<SnapshotPage, OptionsDataError> {
        let response: ChainSnapshotResponse = match cursor {
            Some(cursor) => self.http.get_next(cursor.as_str()).await?,
            None => {
                self.http
                    .get(
                        &["v3", "snapshot", "options", underlying],
                        &[("limit", CHAIN_SNAPSHOT_PAGE_LIMIT.to_string())],
                    )
                    .await?
            }
        };

        let snapshots = response
            .results
            .into_iter()
            .filter_map(|item| {
                let ticker = item.ticker()?.to_string();
                Some(item.into_snapshot(ticker))
            })
            .collect();

        Ok(SnapshotPage {
            snapshots,
            next: response.next_url.map(PageCursor::new),
        })
    }
}
