//! Infrastructure Layer
//!
//! Adapters for external systems plus process-level concerns.
//!
//! - `polygon`: Options data and price lookup over Polygon's REST API
//! - `http`: Axum REST surface
//! - `config`: Environment configuration
//! - `telemetry`: `tracing` subscriber and optional OTLP export
//! - `metrics`: Prometheus recorder and the metrics pipeline observer

pub mod config;
pub mod http;
pub mod metrics;
pub mod polygon;
pub mod telemetry;
