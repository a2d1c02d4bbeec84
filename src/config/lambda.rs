use crate::config::TransformerConfig;
use crate::utils::error::{FlowLogError, Result};
use std::env;
use std::str::FromStr;

pub const CONFIG_FILE_VAR: &str = "FLOWLOG_CONFIG_FILE";

impl TransformerConfig {
    /// Lambda 環境：可選的 TOML 檔為基礎，再以環境變數覆蓋
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var(CONFIG_FILE_VAR) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::info!("📁 Loading configuration from {}", path);
                Self::from_file(path)?
            }
            _ => Self::default(),
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(source) = env_string("HEC_SOURCE") {
            self.destination.source = source;
        }
        if let Some(sourcetype) = env_string("HEC_SOURCETYPE") {
            self.destination.sourcetype = sourcetype;
        }
        if let Some(index) = env_string("HEC_INDEX") {
            self.destination.index = Some(index);
        }
        if let Some(host) = env_string("HEC_HOST") {
            self.destination.host = Some(host);
        }
        if let Some(level) = env_string("LOG_LEVEL") {
            self.logging.level = level.to_ascii_lowercase();
        }
        if let Some(value) = env_number("MAX_RECORD_BYTES")? {
            self.limits.max_record_bytes = value;
        }
        if let Some(value) = env_number("MAX_RESPONSE_BYTES")? {
            self.limits.max_response_bytes = value;
        }
        if let Some(value) = env_number("TIMEOUT_MS")? {
            self.limits.timeout_ms = value;
        }
        if let Some(value) = env_number("MEMORY_LIMIT_MB")? {
            self.limits.memory_limit_mb = value;
        }
        if let Some(value) = env_number("WORKER_THREADS")? {
            self.processing.worker_threads = value;
        }
        Ok(())
    }
}

fn env_string(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn env_number<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = env_string(name) else {
        return Ok(None);
    };

    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| FlowLogError::InvalidConfigValueError {
            field: name.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        })
}
