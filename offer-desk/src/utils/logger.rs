//! Logging Infrastructure
//!
//! Structured logging setup for the desk binary. The engine itself only emits
//! `tracing` events; installing a subscriber is the binary's job.

use std::path::Path;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Initialize the logger with optional daily-rolling file output
///
/// Logs go to stderr so the JSON report on stdout stays machine-readable.
/// `RUST_LOG` directives win over `log_level`. A second call is a no-op.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level(log_level.unwrap_or("info")).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.is_dir()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "offer-desk");
            let _ = subscriber
                .with_ansi(false)
                .with_writer(file_appender)
                .try_init();
            return;
        }
    }

    let _ = subscriber.with_writer(std::io::stderr).try_init();
}

/// `LOG_LEVEL` as a filter; anything unparseable means `info`
fn default_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::INFO)
}
