use crate::core::decoder::FlowLogDecoder;
use crate::core::transformer::HecTransformer;
use crate::core::{ConfigProvider, Decoded, FlowLogFields, InputRecord, Pipeline};
use crate::utils::error::{DecodeError, TransformError};

/// VPC flow log -> Splunk HEC
#[derive(Debug, Clone)]
pub struct FlowLogPipeline {
    decoder: FlowLogDecoder,
    transformer: HecTransformer,
}

impl FlowLogPipeline {
    pub fn new<C: ConfigProvider>(config: &C) -> Self {
        Self {
            decoder: FlowLogDecoder::new(),
            transformer: HecTransformer::from_config(config),
        }
    }
}

impl Pipeline for FlowLogPipeline {
    fn decode(&self, record: &InputRecord) -> Result<Decoded, DecodeError> {
        self.decoder.decode(&record.data)
    }

    fn transform(&self, fields: &FlowLogFields) -> Result<Vec<u8>, TransformError> {
        let event = self.transformer.transform(fields)?;
        self.transformer.encode(&event)
    }
}
