pub mod decoder;
pub mod engine;
pub mod pipeline;
pub mod transformer;

pub use crate::domain::model::{
    Decoded, FieldNames, FirehoseRequest, FirehoseResponse, FlowAction, FlowLogFields,
    InputRecord, OutputRecord, RecordResult, SkipReason, TransformedEvent,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline};
pub use crate::utils::error::Result;
