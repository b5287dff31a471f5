//! Prometheus Metrics Module
//!
//! Exposes pipeline metrics via Prometheus format for monitoring.
//!
//! # Metrics
//!
//! - `put_screener_stage_records_total{stage,direction}`: records entering
//!   (`in`) and leaving (`out`) each pipeline stage
//! - `put_screener_snapshot_failures_total`: snapshots replaced by placeholders
//! - `put_screener_listing_interruptions_total`: contract listings cut short
//! - `put_screener_pipeline_runs_total`: completed pipeline runs
//!
//! # Integration
//!
//! Metrics are exposed at `/metrics` on the HTTP port.

use std::sync::OnceLock;

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::application::ports::{OptionsDataError, PipelineObserver, PipelineStage};

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// Safe to call more than once; later calls return the first handle.
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();

            if let Err(e) = metrics::set_global_recorder(recorder) {
                tracing::warn!(error = %e, "Metrics recorder already installed");
            }

            register_metrics();
            handle
        })
        .clone()
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    describe_counter!(
        "put_screener_stage_records_total",
        "Records entering and leaving each pipeline stage"
    );
    describe_counter!(
        "put_screener_snapshot_failures_total",
        "Snapshot requests replaced by empty placeholders"
    );
    describe_counter!(
        "put_screener_listing_interruptions_total",
        "Contract listings ended early by a failed page"
    );
    describe_counter!(
        "put_screener_pipeline_runs_total",
        "Completed screening pipeline runs"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Record stage throughput.
pub fn record_stage(stage: PipelineStage, count_in: usize, count_out: usize) {
    counter!(
        "put_screener_stage_records_total",
        "stage" => stage.as_str(),
        "direction" => "in"
    )
    .increment(count_in as u64);
    counter!(
        "put_screener_stage_records_total",
        "stage" => stage.as_str(),
        "direction" => "out"
    )
    .increment(count_out as u64);
}

/// Record an absorbed snapshot failure.
pub fn record_snapshot_failure() {
    counter!("put_screener_snapshot_failures_total").increment(1);
}

/// Record an interrupted contract listing.
pub fn record_listing_interruption() {
    counter!("put_screener_listing_interruptions_total").increment(1);
}

/// Record a completed pipeline run.
pub fn record_pipeline_run() {
    counter!("put_screener_pipeline_runs_total").increment(1);
}

// =============================================================================
// Pipeline Observer
// =============================================================================

/// Observer emitting structured log events and Prometheus counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsPipelineObserver;

impl PipelineObserver for MetricsPipelineObserver {
    fn stage_completed(
        &self,
        symbol: &str,
        stage: PipelineStage,
        count_in: usize,
        count_out: usize,
    ) {
        tracing::info!(
            symbol = %symbol,
            stage = stage.as_str(),
            count_in,
            count_out,
            "Pipeline stage completed"
        );
        record_stage(stage, count_in, count_out);
    }

    fn listing_interrupted(&self, symbol: &str, pages: usize, error: &OptionsDataError) {
        tracing::warn!(symbol = %symbol, pages, error = %error, "Contract listing interrupted");
        record_listing_interruption();
    }

    fn snapshot_failed(&self, symbol: &str, ticker: &str, error: &OptionsDataError) {
        tracing::debug!(
            symbol = %symbol,
            ticker = %ticker,
            error = %error,
            "Snapshot replaced by placeholder"
        );
        record_snapshot_failure();
    }

    fn pipeline_completed(&self, symbol: &str, results: usize) {
        tracing::info!(symbol = %symbol, results, "Pipeline completed");
        record_pipeline_run();
    }
}

// =============================================================================
// Tests
// =============================================================================
