//! Configuration module.
//!
//! Loads screener configuration from environment variables.

mod settings;

pub use settings::{ConfigError, ScreenerConfig, ServerSettings};
