use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowLogError {
    #[error("Malformed batch: {message}")]
    BatchStructureError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Worker pool error: {0}")]
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, FlowLogError>;

/// 單筆記錄解碼失敗，只影響該筆記錄
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("record data is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("decoded record is not valid UTF-8")]
    InvalidUtf8,

    #[error("record envelope is not a valid flow-log message: {0}")]
    InvalidEnvelope(String),

    #[error("unsupported flow log version '{0}'")]
    UnsupportedVersion(String),

    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid value '{value}' for field '{field}': {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("failed to serialize event: {0}")]
    Serialization(String),

    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(u64),

    #[error("encoded event is {size} bytes, exceeding the {limit} byte record limit")]
    RecordTooLarge { size: usize, limit: usize },

    #[error("response would reach {projected} bytes, exceeding the {limit} byte response limit")]
    ResponseTooLarge { projected: usize, limit: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let error = DecodeError::FieldCount {
            expected: 14,
            found: 3,
        };
        assert_eq!(error.to_string(), "expected 14 fields, found 3");

        let error = DecodeError::InvalidField {
            field: "srcport",
            value: "http".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "invalid value 'http' for field 'srcport': invalid digit found in string"
        );
    }

    #[test]
    fn test_transform_error_display() {
        let error = TransformError::RecordTooLarge {
            size: 2048,
            limit: 1024,
        };
        assert_eq!(
            error.to_string(),
            "encoded event is 2048 bytes, exceeding the 1024 byte record limit"
        );
    }

    #[test]
    fn test_serde_error_converts_with_question_mark() {
        fn parse(body: &str) -> Result<serde_json::Value> {
            Ok(serde_json::from_str(body)?)
        }

        let err = parse("{").unwrap_err();
        assert!(matches!(err, FlowLogError::SerializationError(_)));
    }

    #[test]
    fn test_batch_structure_error_display() {
        let error = FlowLogError::BatchStructureError {
            message: "missing field `records`".to_string(),
        };
        assert_eq!(error.to_string(), "Malformed batch: missing field `records`");
    }
}
