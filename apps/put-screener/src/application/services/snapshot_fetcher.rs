//! Snapshot Fetcher
//!
//! Retrieves one quote snapshot per requested ticker. Failures are absorbed
//! into all-absent placeholders so a single bad contract never costs the
//! others their quotes.
//!
//! Two strategies:
//!
//! - [`SnapshotStrategy::PerTicker`]: one request per ticker, run as a
//!   `JoinSet` bounded by a semaphore and drained as tasks complete.
//! - [`SnapshotStrategy::Batch`]: page through the underlying's chain
//!   snapshot and keep the requested tickers.

use std::collections::{HashMap, HashSet};
use std::pin::pin;
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::pagination::paginate;
use crate::application::ports::{OptionsDataError, OptionsDataPort, PageCursor};
use crate::domain::Snapshot;

/// Default number of in-flight snapshot requests.
pub const DEFAULT_SNAPSHOT_CONCURRENCY: usize = 5;

/// How snapshots are retrieved from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotStrategy {
    /// One request per contract.
    #[default]
    PerTicker,
    /// Paged chain snapshot for the whole underlying.
    Batch,
}

impl SnapshotStrategy {
    /// Parse strategy from string, defaulting to per-ticker.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "batch" | "chain" => Self::Batch,
            _ => Self::PerTicker,
        }
    }

    /// Configuration name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PerTicker => "per_ticker",
            Self::Batch => "batch",
        }
    }
}

/// A ticker whose snapshot was replaced by a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFailure {
    /// Contract identifier.
    pub ticker: String,
    /// Why the snapshot is missing.
    pub error: OptionsDataError,
}

/// Snapshots for a set of tickers.
#[derive(Debug, Clone, Default)]
pub struct SnapshotFetch {
    /// Exactly one snapshot per distinct requested ticker, in no particular order.
    pub snapshots: Vec<Snapshot>,
    /// Tickers that received a placeholder because a request failed.
    pub failures: Vec<SnapshotFailure>,
}

/// Concurrent snapshot retrieval.
pub struct SnapshotFetcher<P: OptionsDataPort + 'static> {
    port: Arc<P>,
    strategy: SnapshotStrategy,
    concurrency: usize,
}

impl<P: OptionsDataPort + 'static> SnapshotFetcher<P> {
    /// Create a fetcher; a concurrency of zero is treated as one.
    pub fn new(port: Arc<P>, strategy: SnapshotStrategy, concurrency: usize) -> Self {
        Self {
            port,
            strategy,
            concurrency: concurrency.max(1),
        }
    }

    /// Active strategy.
    pub const fn strategy(&self) -> SnapshotStrategy {
        self.strategy
    }

    /// Fetch snapshots for `tickers` of `underlying`.
    pub async fn fetch(&self, underlying: &str, tickers: &[String]) -> SnapshotFetch {
        let mut seen = HashSet::new();
        let tickers: Vec<String> = tickers
            .iter()
            .filter(|t| seen.insert(t.as_str()))
            .cloned()
            .collect();

        if tickers.is_empty() {
            return SnapshotFetch::default();
        }

        match self.strategy {
            SnapshotStrategy::PerTicker => self.fetch_per_ticker(underlying, tickers).await,
            SnapshotStrategy::Batch => self.fetch_batch(underlying, tickers).await,
        }
    }

    async fn fetch_per_ticker(&self, underlying: &str, tickers: Vec<String>) -> SnapshotFetch {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for ticker in &tickers {
            let port = Arc::clone(&self.port);
            let semaphore = Arc::clone(&semaphore);
            let underlying = underlying.to_string();
            let ticker = ticker.clone();

            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => port.get_snapshot(&underlying, &ticker).await,
                    Err(e) => Err(OptionsDataError::Connection {
                        message: e.to_string(),
                    }),
                };
                (ticker, result)
            });
        }

        let mut fetch = SnapshotFetch::default();
        let mut pending: HashSet<String> = tickers.into_iter().collect();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((ticker, result)) => {
                    pending.remove(&ticker);
                    fetch.record(ticker, result);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Snapshot task aborted");
                }
            }
        }

        // Tasks that panicked or were cancelled never reported a ticker.
        for ticker in pending {
            fetch.record(
                ticker,
                Err(OptionsDataError::Connection {
                    message: "snapshot task aborted".to_string(),
                }),
            );
        }

        fetch
    }

    async fn fetch_batch(&self, underlying: &str, tickers: Vec<String>) -> SnapshotFetch {
        let port = self.port.as_ref();
        let mut pages = pin!(paginate(move |cursor: Option<PageCursor>| async move {
            port.list_chain_snapshots(underlying, cursor.as_ref()).await
        }));

        let wanted: HashSet<&str> = tickers.iter().map(String::as_str).collect();
        let mut found: HashMap<String, Snapshot> = HashMap::new();
        let mut interrupted = None;

        while let Some(page) = pages.next().await {
            match page {
                Ok(snapshots) => {
                    for snapshot in snapshots {
                        if wanted.contains(snapshot.ticker.as_str()) {
                            found.entry(snapshot.ticker.clone()).or_insert(snapshot);
                        }
                    }
                    if found.len() == wanted.len() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        underlying = %underlying,
                        found = found.len(),
                        error = %e,
                        "Chain snapshot paging interrupted"
                    );
                    interrupted = Some(e);
                    break;
                }
            }
        }

        let mut fetch = SnapshotFetch::default();
        for ticker in tickers {
            match found.remove(&ticker) {
                Some(snapshot) => fetch.snapshots.push(snapshot),
                None => match &interrupted {
                    Some(e) => fetch.record(ticker, Err(e.clone())),
                    None => fetch.snapshots.push(Snapshot::unavailable(ticker)),
                },
            }
        }

        fetch
    }
}

impl SnapshotFetch {
    fn record(&mut self, ticker: String, result: Result<Snapshot, OptionsDataError>) {
        match result {
            Ok(mut snapshot) => {
                snapshot.ticker = ticker;
                self.snapshots.push(snapshot);
            }
            Err(error) => {
                tracing::debug!(ticker = %ticker, error = %error, "Snapshot unavailable");
                self.snapshots.push(Snapshot::unavailable(ticker.clone()));
                self.failures.push(SnapshotFailure { ticker, error });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rust_decimal_macros::dec;

    use super::*;
    use crate::application::test_support::ScriptedOptionsData;

    fn quoted(ticker: &str) -> Snapshot {
        Snapshot {
            ticker: ticker.to_string(),
            bid: Some(dec!(2.0)),
            ask: Some(dec!(2.2)),
            day_close: None,
        }
    }

    fn tickers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn sorted_tickers(fetch: &SnapshotFetch) -> Vec<String> {
        let mut out: Vec<_> = fetch.snapshots.iter().map(|s| s.ticker.clone()).collect();
        out.sort();
        out
    }

    #[test]
    fn strategy_parsing() {
        assert_eq!(
            SnapshotStrategy::from_str_case_insensitive("BATCH"),
            SnapshotStrategy::Batch
        );
        assert_eq!(
            SnapshotStrategy::from_str_case_insensitive("per_ticker"),
            SnapshotStrategy::PerTicker
        );
        assert_eq!(
            SnapshotStrategy::from_str_case_insensitive("unknown"),
            SnapshotStrategy::PerTicker
        );
        assert_eq!(SnapshotStrategy::Batch.as_str(), "batch");
    }

    #[tokio::test]
    async fn one_snapshot_per_ticker_with_failures_absorbed() {
        let port = Arc::new(
            ScriptedOptionsData::new()
                .with_snapshot(quoted("a"))
                .with_failing_snapshot("b", OptionsDataError::RateLimited)
                .with_snapshot(quoted("c")),
        );
        let fetcher = SnapshotFetcher::new(port, SnapshotStrategy::PerTicker, 5);

        let fetch = fetcher.fetch("AAPL", &tickers(&["a", "b", "c"])).await;

        assert_eq!(sorted_tickers(&fetch), vec!["a", "b", "c"]);
        assert_eq!(fetch.failures.len(), 1);
        assert_eq!(fetch.failures[0].ticker, "b");
        let b = fetch.snapshots.iter().find(|s| s.ticker == "b").unwrap();
        assert!(b.is_empty());
    }

    #[tokio::test]
    async fn duplicate_tickers_fetched_once() {
        let port = Arc::new(ScriptedOptionsData::new().with_snapshot(quoted("a")));
        let fetcher = SnapshotFetcher::new(Arc::clone(&port), SnapshotStrategy::PerTicker, 5);

        let fetch = fetcher.fetch("AAPL", &tickers(&["a", "a"])).await;

        assert_eq!(fetch.snapshots.len(), 1);
        assert_eq!(port.snapshot_calls(), 1);
    }

    #[tokio::test]
    async fn concurrency_is_bounded() {
        let names: Vec<String> = (0..20).map(|i| format!("t{i}")).collect();
        let mut port = ScriptedOptionsData::new().with_snapshot_delay(Duration::from_millis(20));
        for name in &names {
            port = port.with_snapshot(quoted(name));
        }
        let port = Arc::new(port);
        let fetcher = SnapshotFetcher::new(Arc::clone(&port), SnapshotStrategy::PerTicker, 3);

        let fetch = fetcher.fetch("AAPL", &names).await;

        assert_eq!(fetch.snapshots.len(), 20);
        assert!(port.max_in_flight() <= 3);
        assert!(port.max_in_flight() >= 1);
    }

    #[tokio::test]
    async fn zero_concurrency_still_makes_progress() {
        let port = Arc::new(ScriptedOptionsData::new().with_snapshot(quoted("a")));
        let fetcher = SnapshotFetcher::new(port, SnapshotStrategy::PerTicker, 0);
        assert_eq!(fetcher.strategy(), SnapshotStrategy::PerTicker);

        let fetch = fetcher.fetch("AAPL", &tickers(&["a"])).await;

        assert_eq!(fetch.snapshots, vec![quoted("a")]);
    }

    #[tokio::test]
    async fn empty_request_issues_no_calls() {
        let port = Arc::new(ScriptedOptionsData::new());
        let fetcher = SnapshotFetcher::new(Arc::clone(&port), SnapshotStrategy::PerTicker, 5);

        let fetch = fetcher.fetch("AAPL", &[]).await;

        assert!(fetch.snapshots.is_empty());
        assert_eq!(port.snapshot_calls(), 0);
    }

    #[tokio::test]
    async fn batch_selects_requested_tickers_across_pages() {
        let port = Arc::new(
            ScriptedOptionsData::new()
                .with_chain_page(vec![quoted("a"), quoted("other")])
                .with_chain_page(vec![quoted("c")]),
        );
        let fetcher = SnapshotFetcher::new(Arc::clone(&port), SnapshotStrategy::Batch, 5);

        let fetch = fetcher.fetch("AAPL", &tickers(&["a", "c", "missing"])).await;

        assert_eq!(sorted_tickers(&fetch), vec!["a", "c", "missing"]);
        assert!(fetch.failures.is_empty());
        let missing = fetch
            .snapshots
            .iter()
            .find(|s| s.ticker == "missing")
            .unwrap();
        assert!(missing.is_empty());
        assert_eq!(port.snapshot_calls(), 0);
    }

    #[tokio::test]
    async fn batch_stops_once_all_tickers_found() {
        let port = Arc::new(
            ScriptedOptionsData::new()
                .with_chain_page(vec![quoted("a")])
                .with_chain_page(vec![quoted("b")]),
        );
        let fetcher = SnapshotFetcher::new(Arc::clone(&port), SnapshotStrategy::Batch, 5);

        let fetch = fetcher.fetch("AAPL", &tickers(&["a"])).await;

        assert_eq!(fetch.snapshots.len(), 1);
        assert_eq!(port.chain_requests.lock().len(), 1);
    }

    #[tokio::test]
    async fn batch_page_failure_marks_remaining_tickers() {
        let port = Arc::new(
            ScriptedOptionsData::new()
                .with_chain_page(vec![quoted("a")])
                .with_failing_chain_page(OptionsDataError::RateLimited),
        );
        let fetcher = SnapshotFetcher::new(port, SnapshotStrategy::Batch, 5);

        let fetch = fetcher.fetch("AAPL", &tickers(&["a", "b"])).await;

        assert_eq!(sorted_tickers(&fetch), vec!["a", "b"]);
        assert_eq!(fetch.failures.len(), 1);
        assert_eq!(fetch.failures[0].ticker, "b");
    }
}
