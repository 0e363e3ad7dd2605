//! Structured Logger
//!
//! Wraps `tracing` with environment-based level control, a console layer on
//! stderr, and an optional daily-rolling NDJSON file.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_NAME: &str = "cmdshell.log";

/// Initialize the global logger. `RUST_LOG` overrides `level`.
/// Writes to stderr so stdout stays free for command output.
pub fn init_logger(log_dir: Option<&Path>, level: &str, json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Rolling file appender: writes NDJSON to `<dir>/cmdshell.log.YYYY-MM-DD`
    let file_layer = log_dir.map(|dir| {
        fmt::layer()
            .json()
            .with_writer(RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_NAME))
            .with_ansi(false)
    });

    let registry = tracing_subscriber::registry().with(env_filter).with(file_layer);

    let _ = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init()
    };
}
