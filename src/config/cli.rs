use crate::config::TransformerConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "flowlog-hec")]
#[command(about = "Run the Firehose VPC flow log -> Splunk HEC transformation locally")]
pub struct CliConfig {
    /// Firehose transformation event (JSON), "-" reads stdin
    #[arg(long, default_value = "-")]
    pub event: String,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<String>,

    /// Write the response here instead of stdout
    #[arg(long)]
    pub output: Option<String>,

    /// Print the decoded HEC events of Ok records instead of the Firehose response
    #[arg(long)]
    pub payloads: bool,

    #[arg(long)]
    pub source: Option<String>,

    #[arg(long)]
    pub sourcetype: Option<String>,

    #[arg(long)]
    pub index: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub worker_threads: Option<usize>,

    #[arg(long)]
    pub max_record_bytes: Option<usize>,

    /// trace, debug, info, warn or error (RUST_LOG takes precedence)
    #[arg(long)]
    pub log_level: Option<String>,

    #[arg(long, help = "Enable verbose output (same as --log-level debug)")]
    pub verbose: bool,

    #[arg(long, help = "Report memory usage against the configured ceiling")]
    pub monitor: bool,
}

impl CliConfig {
    /// 載入設定檔 (若有) 並套用命令列覆蓋
    pub fn resolve(&self) -> Result<TransformerConfig> {
        let mut config = match &self.config {
            Some(path) => TransformerConfig::from_file(path)?,
            None => TransformerConfig::default(),
        };

        if let Some(source) = &self.source {
            config.destination.source = source.clone();
        }
        if let Some(sourcetype) = &self.sourcetype {
            config.destination.sourcetype = sourcetype.clone();
        }
        if let Some(index) = &self.index {
            config.destination.index = Some(index.clone());
        }
        if let Some(host) = &self.host {
            config.destination.host = Some(host.clone());
        }
        if let Some(worker_threads) = self.worker_threads {
            config.processing.worker_threads = worker_threads;
        }
        if let Some(max_record_bytes) = self.max_record_bytes {
            config.limits.max_record_bytes = max_record_bytes;
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        } else if let Some(level) = &self.log_level {
            config.logging.level = level.to_ascii_lowercase();
        }

        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("event", &self.event)?;
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        if let Some(path) = &self.output {
            validate_path("output", path)?;
        }
        Ok(())
    }
}
