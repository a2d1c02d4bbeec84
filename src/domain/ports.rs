use crate::domain::model::{Decoded, FieldNames, FlowLogFields, InputRecord};
use crate::utils::error::{DecodeError, TransformError};

pub trait ConfigProvider: Send + Sync {
    fn source(&self) -> &str;
    fn sourcetype(&self) -> &str;
    fn index(&self) -> Option<&str>;
    fn host(&self) -> Option<&str>;
    fn field_names(&self) -> &FieldNames;
    fn max_record_bytes(&self) -> usize;
    fn max_response_bytes(&self) -> usize;
    fn worker_threads(&self) -> usize;
    fn timeout_ms(&self) -> u64;
}

/// 單筆記錄的解碼與轉換，實作必須是無狀態的
pub trait Pipeline: Send + Sync {
    fn decode(&self, record: &InputRecord) -> Result<Decoded, DecodeError>;
    fn transform(&self, fields: &FlowLogFields) -> Result<Vec<u8>, TransformError>;
}
