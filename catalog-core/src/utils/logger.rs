//! Logging Infrastructure
//!
//! Structured logging setup for the CLI and for embedding applications.

use std::path::Path;

/// Initialize the logger with optional file output
///
/// When `log_dir` exists, output goes to a daily rolling file named
/// `catalog-core.<date>` instead of stdout. Calling this twice is harmless:
/// the second subscriber is simply not installed.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&Path>) {
    let level = log_level.unwrap_or("info");

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir
        && dir.exists()
    {
        let file_appender = tracing_appender::rolling::daily(dir, "catalog-core");
        let _ = subscriber.with_writer(file_appender).try_init();
        return;
    }

    let _ = subscriber.try_init();
}
