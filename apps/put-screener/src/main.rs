//! Put Screener Binary
//!
//! Starts the screening HTTP service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin put-screener
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `POLYGON_API_KEY` (or `API_KEY`): Polygon API key
//!
//! ## Optional
//! - `POLYGON_BASE_URL`: API host (default: <https://api.polygon.io>)
//! - `SCREENER_HTTP_PORT`: HTTP port (default: 5000)
//! - `SCREENER_REQUEST_TIMEOUT_SECS`: Per-request timeout (default: 10)
//! - `SCREENER_CONTRACTS_PAGE_LIMIT`: Contracts page size (default: 1000)
//! - `SCREENER_SNAPSHOT_CONCURRENCY`: In-flight snapshot requests (default: 5)
//! - `SCREENER_SNAPSHOT_MODE`: "per_ticker" | "batch" (default: per_ticker)
//! - `SCREENER_PRICE_MAX_ATTEMPTS`: Price lookup attempts (default: 3)
//! - `SCREENER_PRICE_RETRY_DELAY_MS`: Delay between price attempts (default: 1000)
//! - `OTEL_ENABLED`: Enable OpenTelemetry (default: false)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: <http://localhost:4317>)
//! - `OTEL_SERVICE_NAME`: Service name (default: put-screener)
//! - `RUST_LOG`: Log filter (default: put_screener=info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use put_screener::infrastructure::http::{AppState, create_router};
use put_screener::infrastructure::metrics::MetricsPipelineObserver;
use put_screener::infrastructure::polygon::{
    PolygonHttpClient, PolygonOptionsAdapter, PolygonPriceLookup,
};
use put_screener::infrastructure::telemetry;
use put_screener::{
    RetrievePutsUseCase, ScreenSymbolUseCase, ScreenerConfig, init_metrics,
};
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    // Initialize telemetry (tracing + optional OpenTelemetry)
    let telemetry_guard = telemetry::init();

    tracing::info!(
        otel_export = telemetry_guard.is_exporting(),
        "Starting put screener"
    );

    // Initialize Prometheus metrics
    let _metrics_handle = init_metrics();

    let config = ScreenerConfig::from_env().context("invalid configuration")?;
    log_config(&config);

    // Provider adapters share one HTTP client
    let http = PolygonHttpClient::new(&config.polygon).context("failed to build Polygon client")?;
    let options_data = Arc::new(PolygonOptionsAdapter::with_client(http.clone()));
    let prices = Arc::new(PolygonPriceLookup::with_client(http, config.polygon.retry));

    let pipeline = RetrievePutsUseCase::new(
        options_data,
        Arc::new(MetricsPipelineObserver),
        config.pipeline,
    );
    let screen_symbol = Arc::new(ScreenSymbolUseCase::new(prices, pipeline));

    let app = create_router(AppState {
        screen_symbol,
        version: env!("CARGO_PKG_VERSION").to_string(),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to port {}", config.server.port))?;

    tracing::info!(port = config.server.port, "HTTP server listening");

    let shutdown_token = CancellationToken::new();
    tokio::spawn(await_shutdown(shutdown_token.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_token.cancelled_owned())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Put screener stopped");
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        for dir in cwd.ancestors().skip(1) {
            let env_path = dir.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &ScreenerConfig) {
    tracing::info!(
        base_url = %config.polygon.base_url,
        port = config.server.port,
        snapshot_mode = config.pipeline.strategy.as_str(),
        snapshot_concurrency = config.pipeline.concurrency,
        page_limit = config.pipeline.page_limit,
        "Configuration loaded"
    );
    tracing::debug!(
        timeout_secs = config.polygon.timeout.as_secs(),
        price_attempts = config.polygon.retry.max_attempts,
        price_delay_ms = u64::try_from(config.polygon.retry.delay.as_millis()).unwrap_or(u64::MAX),
        "Provider settings"
    );
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
