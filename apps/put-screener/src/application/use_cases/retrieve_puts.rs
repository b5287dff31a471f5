//! Retrieve Puts Use Case
//!
//! The screening pipeline for one symbol:
//!
//! ```text
//! list contracts -> expiry/strike filter -> fetch snapshots
//!     -> compute premiums -> merge -> quality filter
//! ```
//!
//! Provider failures degrade completeness and never fail the run.

use std::sync::Arc;

use crate::application::ports::{ContractQuery, OptionsDataPort, PipelineObserver, PipelineStage};
use crate::application::services::{
    ContractLister, DEFAULT_SNAPSHOT_CONCURRENCY, SnapshotFetcher, SnapshotStrategy,
};
use crate::domain::{ExpiryStrikeFilter, MergedResult, PremiumRecord, ScreeningParams, merge};

/// Default contracts page size.
pub const DEFAULT_PAGE_LIMIT: u32 = 1000;

/// Pipeline tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievePutsConfig {
    /// Contracts page size.
    pub page_limit: u32,
    /// Snapshot retrieval strategy.
    pub strategy: SnapshotStrategy,
    /// Maximum in-flight snapshot requests.
    pub concurrency: usize,
}

impl Default for RetrievePutsConfig {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            strategy: SnapshotStrategy::default(),
            concurrency: DEFAULT_SNAPSHOT_CONCURRENCY,
        }
    }
}

/// Use case running the put screening pipeline.
pub struct RetrievePutsUseCase<P, O>
where
    P: OptionsDataPort + 'static,
    O: PipelineObserver,
{
    lister: ContractLister<P>,
    fetcher: SnapshotFetcher<P>,
    observer: Arc<O>,
    page_limit: u32,
}

impl<P, O> RetrievePutsUseCase<P, O>
where
    P: OptionsDataPort + 'static,
    O: PipelineObserver,
{
    /// Create a new RetrievePutsUseCase.
    pub fn new(port: Arc<P>, observer: Arc<O>, config: RetrievePutsConfig) -> Self {
        Self {
            lister: ContractLister::new(Arc::clone(&port)),
            fetcher: SnapshotFetcher::new(port, config.strategy, config.concurrency),
            observer,
            page_limit: config.page_limit,
        }
    }

    /// Run the pipeline.
    ///
    /// Results are ordered by expiration ascending, then strike descending.
    pub async fn retrieve_puts(&self, params: &ScreeningParams) -> Vec<MergedResult> {
        let symbol = params.symbol();
        let filter = ExpiryStrikeFilter::new(params);
        let (expiration_from, expiration_to) = filter.expiry_window();

        // 1. Discover contracts, narrowed server-side
        let query = ContractQuery::puts(symbol, self.page_limit)
            .with_max_strike(params.current_price())
            .with_expiration_range(expiration_from, expiration_to);
        let listing = self.lister.list_all(&query).await;
        if let Some(error) = &listing.interrupted {
            self.observer
                .listing_interrupted(symbol, listing.pages, error);
        }
        self.observer.stage_completed(
            symbol,
            PipelineStage::ListContracts,
            listing.pages,
            listing.contracts.len(),
        );

        // 2. Client-side window and band
        let listed = listing.contracts.len();
        let contracts = filter.apply(listing.contracts);
        self.observer.stage_completed(
            symbol,
            PipelineStage::ExpiryStrikeFilter,
            listed,
            contracts.len(),
        );

        if contracts.is_empty() {
            self.observer.pipeline_completed(symbol, 0);
            return Vec::new();
        }

        // 3. Fan out for quotes
        let tickers: Vec<String> = contracts.iter().map(|c| c.ticker.clone()).collect();
        tracing::debug!(
            symbol = %symbol,
            strategy = self.fetcher.strategy().as_str(),
            tickers = tickers.len(),
            "Fetching snapshots"
        );
        let fetch = self.fetcher.fetch(symbol, &tickers).await;
        for failure in &fetch.failures {
            self.observer
                .snapshot_failed(symbol, &failure.ticker, &failure.error);
        }
        self.observer.stage_completed(
            symbol,
            PipelineStage::FetchSnapshots,
            tickers.len(),
            fetch.snapshots.len(),
        );

        // 4. Premiums
        let records: Vec<PremiumRecord> = fetch
            .snapshots
            .iter()
            .map(PremiumRecord::from_snapshot)
            .collect();
        let priced = records.iter().filter(|r| r.is_priced()).count();
        self.observer.stage_completed(
            symbol,
            PipelineStage::ComputePremiums,
            records.len(),
            priced,
        );

        // 5. Inner join
        let merged = merge(&contracts, records);
        self.observer.stage_completed(
            symbol,
            PipelineStage::Merge,
            contracts.len(),
            merged.len(),
        );

        // 6. Liquidity thresholds
        let candidates = merged.len();
        let results = params.thresholds().apply(merged);
        self.observer.stage_completed(
            symbol,
            PipelineStage::QualityFilter,
            candidates,
            results.len(),
        );

        self.observer.pipeline_completed(symbol, results.len());
        results
    }
}
