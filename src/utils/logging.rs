//! Logging Setup
//!
//! Installs the global `tracing` subscriber. Output goes to a log file so it
//! never interleaves with the streamed answer on the terminal.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::utils::error::AppResult;
use crate::utils::paths::ensure_dir;

/// Append structured logs to `path`. The filter comes from `RUST_LOG`,
/// defaulting to `info`.
pub fn init_file_logging(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let log_file = OpenOptions::new().create(true).append(true).open(path)?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(log_file))
        .try_init();
    if let Err(e) = installed {
        // The subscriber already installed keeps receiving events
        tracing::debug!("[Logging] Subscriber already set, keeping it: {}", e);
        return Ok(());
    }

    tracing::info!("[Logging] Writing logs to {}", path.display());
    Ok(())
}
