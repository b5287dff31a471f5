//! Application Use Cases
//!
//! Use cases orchestrate the pipeline stages for a caller.

mod retrieve_puts;
mod screen_symbol;

pub use retrieve_puts::{RetrievePutsConfig, RetrievePutsUseCase};
pub use screen_symbol::{ScreenResult, ScreenSymbolRequest, ScreenSymbolUseCase};
