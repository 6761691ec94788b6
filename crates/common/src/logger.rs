use crate::config::AppConfig;
use crate::error::ContentGenError;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Log file written inside `AppConfig::log_dir`
pub const LOG_FILE_NAME: &str = "contentgen.log";

/// Transport crates are chatty at debug level; keep them at warn unless
/// RUST_LOG asks otherwise.
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "reqwest=warn", "h2=warn", "rustls=warn"];

/// Build the filter for a configured level. RUST_LOG takes precedence.
pub fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)))
}

fn default_directives(log_level: &str) -> String {
    let level = parse_log_level(log_level).to_string().to_lowercase();
    let mut directives = vec![level];
    directives.extend(QUIET_DEPENDENCIES.iter().map(|d| d.to_string()));
    directives.join(",")
}

/// Initialize logging to the console and to `<log_dir>/contentgen.log`
pub fn setup_logging(config: &AppConfig) -> Result<(), ContentGenError> {
    config.ensure_directories()?;

    let log_file_path = config.log_dir.join(LOG_FILE_NAME);
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .map_err(|e| {
            ContentGenError::config(format!(
                "Failed to open log file {}: {}",
                log_file_path.display(),
                e
            ))
        })?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(build_filter(&config.log_level));

    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(build_filter(&config.log_level));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| ContentGenError::config(format!("Failed to install log subscriber: {}", e)))?;

    tracing::info!(
        level = %config.log_level,
        file = %log_file_path.display(),
        "Logging initialized"
    );

    Ok(())
}

/// Console-only logging for development
pub fn setup_console_logging(log_level: &str) -> Result<(), ContentGenError> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_line_number(true)
        .with_env_filter(build_filter(log_level))
        .try_init()
        .map_err(|e| ContentGenError::config(format!("Failed to install log subscriber: {}", e)))?;

    tracing::info!(level = %log_level, "Console logging initialized");

    Ok(())
}

/// Parse string to tracing Level
pub fn parse_log_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
