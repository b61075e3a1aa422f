//! `tracing` setup for the `tasksms` binary.
//!
//! Stderr logging is always on. With `--log-dir`, [`init_production`] adds a
//! JSON file layer rotated daily, so cron-driven runs leave a record.

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// File name prefix; the appender adds `.YYYY-MM-DD`.
const LOG_FILE_PREFIX: &str = "tasksms.log";

/// Keeps the background file writer running.
///
/// Hold it until the process exits; dropping it flushes buffered lines.
pub struct LoggingGuard {
    _worker: WorkerGuard,
}

/// Log to stderr and to `{logs_dir}/tasksms.log.YYYY-MM-DD` as JSON.
///
/// `RUST_LOG` filters both outputs (default: `info`).
///
/// # Errors
///
/// Fails when `logs_dir` cannot be created or another global subscriber is
/// already installed.
pub fn init_production(logs_dir: &Path) -> anyhow::Result<LoggingGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("failed to create logs directory {}", logs_dir.display()))?;

    let (file_writer, worker) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX));

    tracing_subscriber::registry()
        .with(default_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(file_writer),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("failed to install log subscriber")?;

    Ok(LoggingGuard { _worker: worker })
}

/// Log to stderr only. Later calls leave the first subscriber in place.
pub fn init_cli() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
