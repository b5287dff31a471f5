//! Pipeline Observer Port (Driven Port)
//!
//! Receives per-stage record counts and absorbed failures so the pipeline
//! itself stays free of logging and metrics calls.

use super::OptionsDataError;

/// Pipeline stage identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Paginated contract discovery.
    ListContracts,
    /// Expiry window and strike band.
    ExpiryStrikeFilter,
    /// Quote snapshot fan-out.
    FetchSnapshots,
    /// Premium/spread derivation.
    ComputePremiums,
    /// Inner join on ticker.
    Merge,
    /// Minimum premium / maximum spread.
    QualityFilter,
}

impl PipelineStage {
    /// Stable label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListContracts => "list_contracts",
            Self::ExpiryStrikeFilter => "expiry_strike_filter",
            Self::FetchSnapshots => "fetch_snapshots",
            Self::ComputePremiums => "compute_premiums",
            Self::Merge => "merge",
            Self::QualityFilter => "quality_filter",
        }
    }
}

/// Port for pipeline observability.
pub trait PipelineObserver: Send + Sync {
    /// A stage finished with `count_in` records in and `count_out` out.
    fn stage_completed(
        &self,
        symbol: &str,
        stage: PipelineStage,
        count_in: usize,
        count_out: usize,
    );

    /// Contract pagination stopped early after `pages` pages.
    fn listing_interrupted(&self, symbol: &str, pages: usize, error: &OptionsDataError) {
        let _ = (symbol, pages, error);
    }

    /// A snapshot request failed and was replaced by a placeholder.
    fn snapshot_failed(&self, symbol: &str, ticker: &str, error: &OptionsDataError) {
        let _ = (symbol, ticker, error);
    }

    /// A pipeline run finished with `results` records, including short-circuited runs.
    fn pipeline_completed(&self, symbol: &str, results: usize) {
        let _ = (symbol, results);
    }
}

/// Observer that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPipelineObserver;

impl PipelineObserver for NoOpPipelineObserver {
    fn stage_completed(
        &self,
        _symbol: &str,
        _stage: PipelineStage,
        _count_in: usize,
        _count_out: usize,
    ) {
    }
}
