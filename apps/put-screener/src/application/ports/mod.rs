//! Application Ports (Driven)
//!
//! Interfaces the pipeline uses to reach external systems.

mod options_data_port;
mod pipeline_observer_port;
mod price_lookup_port;

pub use options_data_port::{
    ContractPage, ContractQuery, OptionsDataError, OptionsDataPort, PageCursor, SnapshotPage,
};
pub use pipeline_observer_port::{NoOpPipelineObserver, PipelineObserver, PipelineStage};
pub use price_lookup_port::{PriceLookupError, PriceLookupPort};
