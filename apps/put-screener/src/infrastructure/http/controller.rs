//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to the screening use case.
//!
//! # Endpoints
//!
//! - `GET /` - Service banner
//! - `GET /health` - JSON health status
//! - `GET /api/options/{symbol}` - Screen puts for a symbol
//! - `GET /api/favicon.ico` - Empty response
//! - `GET /metrics` - Prometheus metrics in text format

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::request::OptionsQuery;
use super::response::{ApiError, HealthResponse, MessageResponse, OptionsResponse};
use crate::application::ports::{OptionsDataPort, PipelineObserver, PriceLookupPort};
use crate::application::use_cases::ScreenSymbolUseCase;
use crate::infrastructure::metrics::get_metrics_handle;

/// Application state shared across handlers.
pub struct AppState<P, L, O>
where
    P: OptionsDataPort + 'static,
    L: PriceLookupPort,
    O: PipelineObserver,
{
    /// Use case for screening a symbol.
    pub screen_symbol: Arc<ScreenSymbolUseCase<P, L, O>>,
    /// Application version.
    pub version: String,
}

impl<P, L, O> Clone for AppState<P, L, O>
where
    P: OptionsDataPort + 'static,
    L: PriceLookupPort,
    O: PipelineObserver,
{
    fn clone(&self) -> Self {
        Self {
            screen_symbol: Arc::clone(&self.screen_symbol),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<P, L, O>(state: AppState<P, L, O>) -> Router
where
    P: OptionsDataPort + 'static,
    L: PriceLookupPort + 'static,
    O: PipelineObserver + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check::<P, L, O>))
        .route("/api/options/{symbol}", get(get_options::<P, L, O>))
        .route("/api/favicon.ico", get(favicon))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(MessageResponse {
        message: "put screener is running".to_string(),
    })
}

/// Health check endpoint.
async fn health_check<P, L, O>(State(state): State<AppState<P, L, O>>) -> impl IntoResponse
where
    P: OptionsDataPort + 'static,
    L: PriceLookupPort,
    O: PipelineObserver,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Screen puts for a symbol.
async fn get_options<P, L, O>(
    State(state): State<AppState<P, L, O>>,
    Path(symbol): Path<String>,
    query: Result<Query<OptionsQuery>, QueryRejection>,
) -> Result<Json<OptionsResponse>, ApiError>
where
    P: OptionsDataPort + 'static,
    L: PriceLookupPort,
    O: PipelineObserver,
{
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let result = state
        .screen_symbol
        .execute(query.into_request(symbol))
        .await?;

    Ok(Json(OptionsResponse::from(result)))
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn metrics_handler() -> impl IntoResponse {
    get_metrics_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                handle.render(),
            )
        },
    )
}
