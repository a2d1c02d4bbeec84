pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::TransformerConfig;
pub use crate::core::{engine::BatchEngine, pipeline::FlowLogPipeline};
pub use crate::domain::model::{FirehoseRequest, FirehoseResponse, OutputRecord, RecordResult};
pub use crate::utils::error::{FlowLogError, Result};
