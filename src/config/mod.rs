#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::core::{ConfigProvider, FieldNames};
use crate::utils::error::{FlowLogError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOURCE: &str = "aws:firehose:vpcflow";
pub const DEFAULT_SOURCETYPE: &str = "aws:cloudwatchlogs:vpcflow";
pub const DEFAULT_MAX_RECORD_BYTES: usize = 1_000_000;
// 6000000 instead of 6291456 to leave headroom for the response envelope
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 6_000_000;

/// 轉換器的靜態設定，啟動後不可變更
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerConfig {
    pub destination: DestinationConfig,
    pub limits: LimitsConfig,
    pub processing: ProcessingConfig,
    pub logging: LoggingConfig,
    pub fields: FieldNames,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestinationConfig {
    pub source: String,
    pub sourcetype: String,
    pub index: Option<String>,
    pub host: Option<String>,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            sourcetype: DEFAULT_SOURCETYPE.to_string(),
            index: None,
            host: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_record_bytes: usize,
    pub max_response_bytes: usize,
    pub timeout_ms: u64,
    pub memory_limit_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            timeout_ms: 60_000,
            memory_limit_mb: 512,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// 0 = one worker per CPU
    pub worker_threads: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace | debug | info | warn | error，RUST_LOG 優先
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ConfigProvider for TransformerConfig {
    fn source(&self) -> &str {
        &self.destination.source
    }

    fn sourcetype(&self) -> &str {
        &self.destination.sourcetype
    }

    fn index(&self) -> Option<&str> {
        self.destination.index.as_deref()
    }

    fn host(&self) -> Option<&str> {
        self.destination.host.as_deref()
    }

    fn field_names(&self) -> &FieldNames {
        &self.fields
    }

    fn max_record_bytes(&self) -> usize {
        self.limits.max_record_bytes
    }

    fn max_response_bytes(&self) -> usize {
        self.limits.max_response_bytes
    }

    fn worker_threads(&self) -> usize {
        self.processing.worker_threads
    }

    fn timeout_ms(&self) -> u64 {
        self.limits.timeout_ms
    }
}

impl Validate for TransformerConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("destination.source", &self.destination.source)?;
        validation::validate_non_empty_string(
            "destination.sourcetype",
            &self.destination.sourcetype,
        )?;
        if let Some(index) = &self.destination.index {
            validation::validate_non_empty_string("destination.index", index)?;
        }
        if let Some(host) = &self.destination.host {
            validation::validate_non_empty_string("destination.host", host)?;
        }

        validation::validate_positive_number(
            "limits.max_record_bytes",
            self.limits.max_record_bytes,
            1,
        )?;
        validation::validate_positive_number(
            "limits.max_response_bytes",
            self.limits.max_response_bytes,
            1,
        )?;
        if self.limits.max_record_bytes > self.limits.max_response_bytes {
            return Err(FlowLogError::ConfigValidationError {
                field: "limits.max_record_bytes".to_string(),
                message: format!(
                    "record limit {} exceeds response limit {}",
                    self.limits.max_record_bytes, self.limits.max_response_bytes
                ),
            });
        }
        validation::validate_range("limits.timeout_ms", self.limits.timeout_ms, 1, 900_000)?;
        validation::validate_range(
            "limits.memory_limit_mb",
            self.limits.memory_limit_mb,
            1,
            10_240,
        )?;

        validation::validate_range(
            "processing.worker_threads",
            self.processing.worker_threads,
            0,
            256,
        )?;

        validation::validate_log_level("logging.level", &self.logging.level)?;
        validation::validate_unique_names("fields", self.fields.entries())?;

        tracing::debug!("✅ Transformer configuration validation passed");
        Ok(())
    }
}
