//! Scripted port doubles shared by application tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::application::ports::{
    ContractPage, ContractQuery, OptionsDataError, OptionsDataPort, PageCursor, PipelineObserver,
    PipelineStage, SnapshotPage,
};
use crate::domain::{Contract, Snapshot};

fn cursor_for(index: usize) -> PageCursor {
    PageCursor::new(format!("page-{index}"))
}

fn index_of(cursor: Option<&PageCursor>) -> usize {
    cursor
        .and_then(|c| c.as_str().strip_prefix("page-"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

/// Options data provider answering from canned pages and snapshots.
#[derive(Default)]
pub struct ScriptedOptionsData {
    contract_pages: Vec<Result<Vec<Contract>, OptionsDataError>>,
    chain_pages: Vec<Result<Vec<Snapshot>, OptionsDataError>>,
    snapshots: HashMap<String, Result<Snapshot, OptionsDataError>>,
    snapshot_delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    pub contract_queries: Mutex<Vec<(ContractQuery, Option<PageCursor>)>>,
    pub snapshot_requests: Mutex<Vec<String>>,
    pub chain_requests: Mutex<Vec<Option<PageCursor>>>,
}

impl ScriptedOptionsData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contract_page(mut self, contracts: Vec<Contract>) -> Self {
        self.contract_pages.push(Ok(contracts));
        self
    }

    pub fn with_failing_contract_page(mut self, error: OptionsDataError) -> Self {
        self.contract_pages.push(Err(error));
        self
    }

    pub fn with_chain_page(mut self, snapshots: Vec<Snapshot>) -> Self {
        self.chain_pages.push(Ok(snapshots));
        self
    }

    pub fn with_failing_chain_page(mut self, error: OptionsDataError) -> Self {
        self.chain_pages.push(Err(error));
        self
    }

    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshots
            .insert(snapshot.ticker.clone(), Ok(snapshot));
        self
    }

    pub fn with_failing_snapshot(mut self, ticker: &str, error: OptionsDataError) -> Self {
        self.snapshots.insert(ticker.to_string(), Err(error));
        self
    }

    pub fn with_snapshot_delay(mut self, delay: Duration) -> Self {
        self.snapshot_delay = Some(delay);
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn snapshot_calls(&self) -> usize {
        self.snapshot_requests.lock().len()
    }

    pub fn contract_calls(&self) -> usize {
        self.contract_queries.lock().len()
    }
}

#[async_trait]
impl OptionsDataPort for ScriptedOptionsData {
    async fn list_contracts(
        &self,
        query: &ContractQuery,
        cursor: Option<&PageCursor>,
    ) -> Result<ContractPage, OptionsDataError> {
        self.contract_queries
            .lock()
            .push((query.clone(), cursor.cloned()));

        let index = index_of(cursor);
        let Some(page) = self.contract_pages.get(index) else {
            return Ok(ContractPage::default());
        };
        let contracts = page.clone()?;
        let next = (index + 1 < self.contract_pages.len()).then(|| cursor_for(index + 1));
        Ok(ContractPage { contracts, next })
    }

    async fn get_snapshot(
        &self,
        _underlying: &str,
        ticker: &str,
    ) -> Result<Snapshot, OptionsDataError> {
        self.snapshot_requests.lock().push(ticker.to_string());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.snapshot_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.snapshots
            .get(ticker)
            .cloned()
            .unwrap_or_else(|| {
                Err(OptionsDataError::NotFound {
                    resource: ticker.to_string(),
                })
            })
    }

    async fn list_chain_snapshots(
        &self,
        _underlying: &str,
        cursor: Option<&PageCursor>,
    ) -> Result<SnapshotPage, OptionsDataError> {
        self.chain_requests.lock().push(cursor.cloned());

        let index = index_of(cursor);
        let Some(page) = self.chain_pages.get(index) else {
            return Ok(SnapshotPage::default());
        };
        let snapshots = page.clone()?;
        let next = (index + 1 < self.chain_pages.len()).then(|| cursor_for(index + 1));
        Ok(SnapshotPage { snapshots, next })
    }
}

/// Observer that records every event.
#[derive(Default)]
pub struct RecordingObserver {
    pub stages: Mutex<Vec<(PipelineStage, usize, usize)>>,
    pub snapshot_failures: Mutex<Vec<String>>,
    pub listing_interruptions: Mutex<Vec<usize>>,
    pub completed_runs: Mutex<Vec<usize>>,
}

impl RecordingObserver {
    pub fn stage(&self, stage: PipelineStage) -> Option<(usize, usize)> {
        self.stages
            .lock()
            .iter()
            .find(|(s, _, _)| *s == stage)
            .map(|(_, count_in, count_out)| (*count_in, *count_out))
    }
}

impl PipelineObserver for RecordingObserver {
    fn stage_completed(
        &self,
        _symbol: &str,
        stage: PipelineStage,
        count_in: usize,
        count_out: usize,
    ) {
        self.stages.lock().push((stage, count_in, count_out));
    }

    fn listing_interrupted(&self, _symbol: &str, pages: usize, _error: &OptionsDataError) {
        self.listing_interruptions.lock().push(pages);
    }

    fn snapshot_failed(&self, _symbol: &str, ticker: &str, _error: &OptionsDataError) {
        self.snapshot_failures.lock().push(ticker.to_string());
    }

    fn pipeline_completed(&self, _symbol: &str, results: usize) {
        self.completed_runs.lock().push(results);
    }
}
