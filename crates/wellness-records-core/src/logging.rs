//! Tracing setup for the host application.

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "wellness-records";

/// Install a daily-rolling file subscriber filtered by `RUST_LOG`
/// (default `info`).
///
/// Keep the returned guard alive for as long as logs should be flushed.
/// Fails if a global subscriber is already installed.
pub fn init_logging(log_dir: impl AsRef<Path>) -> anyhow::Result<WorkerGuard> {
    let log_dir = log_dir.as_ref();
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    tracing::info!(log_dir = %log_dir.display(), "Logging initialized");
    Ok(guard)
}
