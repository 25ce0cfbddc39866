//! Logging setup for bikeshare.
//!
//! Console output goes to stderr so it never interleaves with the interactive
//! session on stdout. When file logging is enabled, two daily-rolling files are
//! written to the platform data directory:
//!
//! - `bikeshare.<date>.log`: everything at `info` and above
//! - `error.<date>.log`: warnings and errors only
//!
//! ```no_run
//! bikeshare::logging::init(true).expect("Failed to initialize logging");
//! tracing::info!("Session started");
//! ```

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Gets the log directory path based on platform conventions, creating it if needed.
///
/// - Windows: `%APPDATA%/bikeshare/logs`
/// - macOS: `~/Library/Application Support/bikeshare/logs`
/// - Linux: `~/.local/share/bikeshare/logs`
///
/// # Errors
///
/// Returns error if the data directory is unknown or cannot be created.
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    let log_dir = base_dir.join("bikeshare").join("logs");

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

/// Installs the global subscriber.
///
/// The console honours `RUST_LOG` and defaults to `warn`. The log files always
/// record `info` and above.
///
/// # Errors
///
/// Returns error if the log directory or file appenders cannot be created, or
/// if a global subscriber is already installed.
pub fn init(log_to_file: bool) -> Result<()> {
    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .context("Failed to create env filter")?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let (all_logs_layer, error_logs_layer, log_dir) = if log_to_file {
        let log_dir = get_log_dir()?;

        let all_logs_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .max_log_files(10)
            .filename_prefix("bikeshare")
            .filename_suffix("log")
            .build(&log_dir)
            .context("Failed to create all-logs file appender")?;

        let error_logs_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .max_log_files(10)
            .filename_prefix("error")
            .filename_suffix("log")
            .build(&log_dir)
            .context("Failed to create error-logs file appender")?;

        let all_logs_layer = fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(all_logs_appender)
            .with_filter(EnvFilter::new("info"));

        let error_logs_layer = fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(error_logs_appender)
            .with_filter(EnvFilter::new("warn"));

        (Some(all_logs_layer), Some(error_logs_layer), Some(log_dir))
    } else {
        (None, None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(all_logs_layer)
        .with(error_logs_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    match log_dir {
        Some(dir) => tracing::info!("Logging initialized, log directory: {}", dir.display()),
        None => tracing::info!("Logging initialized, console only"),
    }

    Ok(())
}
