use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

const DEFAULT_FILTER: &str = "txn_quality=info";

/// Initializes the logging system with console output and, when enabled, a
/// daily-rotated JSON log file.
///
/// Console logs go to stderr so the report tables on stdout stay readable.
/// The returned guard flushes the file writer when dropped; hold it until the
/// run ends.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file_layer, guard) = if config.json_file && fs::create_dir_all(&config.directory).is_ok() {
        let file_appender = tracing_appender::rolling::daily(&config.directory, "txn_quality.log");
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
        (Some(fmt::layer().json().with_writer(non_blocking_writer)), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    guard
}
