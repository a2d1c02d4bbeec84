use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 本 crate 與兩個執行檔使用設定的等級，其餘依賴只記錄 warn 以上
pub fn default_directives(level: &str) -> String {
    format!("warn,flowlog_hec={level},lambda={level}")
}

// RUST_LOG 有設定時優先
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

pub fn init_cli_logger(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

pub fn init_lambda_logger(level: &str) {
    // CloudWatch 自帶時間戳，JSON 方便 Logs Insights 查詢
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .json(),
        )
        .init();
}
