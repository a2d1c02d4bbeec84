use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine};
use clap::Parser;
use flowlog_hec::utils::{logger, monitor::SystemMonitor, validation::Validate};
use flowlog_hec::{
    BatchEngine, CliConfig, FirehoseRequest, FirehoseResponse, FlowLogPipeline, RecordResult,
};
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    cli.validate().context("invalid command line arguments")?;
    let config = cli.resolve().context("failed to load configuration")?;
    config.validate().context("configuration validation failed")?;

    // 初始化日誌
    logger::init_cli_logger(&config.logging.level);

    tracing::info!("Starting flowlog-hec CLI");
    tracing::debug!("CLI config: {:?}", cli);

    let mut monitor = SystemMonitor::new(cli.monitor, config.limits.memory_limit_mb);
    if monitor.is_enabled() {
        tracing::info!("🔍 Memory monitoring enabled");
    }

    let body = read_event(&cli.event).await?;
    let request = FirehoseRequest::from_slice(&body)
        .with_context(|| format!("'{}' is not a Firehose transformation event", cli.event))?;
    monitor.log_stats("Event loaded");

    let pipeline = FlowLogPipeline::new(&config);
    let engine = BatchEngine::new(pipeline, &config).context("failed to start worker pool")?;

    let response = tokio::task::block_in_place(|| engine.handle(request))?;
    monitor.log_stats("Batch processed");

    let rendered = if cli.payloads {
        render_payloads(&response)?
    } else {
        serde_json::to_string_pretty(&response)? + "\n"
    };

    match &cli.output {
        Some(path) => {
            tokio::fs::write(path, rendered)
                .await
                .with_context(|| format!("failed to write '{}'", path))?;
            tracing::info!("📁 Output saved to: {}", path);
        }
        None => print!("{}", rendered),
    }

    monitor.log_final_stats();
    Ok(())
}

async fn read_event(path: &str) -> anyhow::Result<Vec<u8>> {
    if path == "-" {
        let mut body = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut body)
            .await
            .context("failed to read event from stdin")?;
        return Ok(body);
    }

    tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read event '{}'", path))
}

// Ok 記錄的 data 已是換行結尾的 HEC 事件
fn render_payloads(response: &FirehoseResponse) -> anyhow::Result<String> {
    let mut rendered = String::new();

    for record in &response.records {
        if record.result != RecordResult::Ok {
            continue;
        }
        let Some(data) = &record.data else {
            continue;
        };
        let payload = STANDARD
            .decode(data)
            .with_context(|| format!("record '{}' has invalid base64 data", record.record_id))?;
        rendered.push_str(&String::from_utf8(payload)?);
    }

    Ok(rendered)
}
