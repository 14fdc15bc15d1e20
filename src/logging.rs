//! Tracing setup. The terminal is owned by the TUI, so diagnostics go to a
//! log file instead: transport failures, dropped payloads, subscription
//! lifecycle.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize a file-backed tracing subscriber. Subsequent calls are no-ops.
/// Returns the log file path so the UI can point the user at it.
pub fn init() -> Result<PathBuf> {
    let log_dir = dirs::data_dir()
        .map(|dir| dir.join("scrapetui"))
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("scrapetui.log");

    if LOG_GUARD.get().is_some() {
        return Ok(log_path);
    }

    let appender = tracing_appender::rolling::never(&log_dir, "scrapetui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer().with_ansi(false).with_writer(writer);

    let subscriber = Registry::default().with(env_filter).with(file_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install global tracing subscriber")?;
    let _ = LOG_GUARD.set(guard);

    tracing::info!("logging initialized; log file at {}", log_path.display());
    Ok(log_path)
}
