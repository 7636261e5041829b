//! Diagnostic log sink with explicit lifecycle.
//!
//! The pipeline appends every failure and validation violation to a log
//! file. The returned guard must be held by the entry point; dropping it
//! flushes and closes the sink on every exit path, success or failure.

use crate::error::Result;
use std::fs::OpenOptions;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialise the process-wide diagnostic sink, appending to `log_path`.
pub fn init(log_path: &Path) -> Result<WorkerGuard> {
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(log_path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
