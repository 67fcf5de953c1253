//! Tracing setup. The terminal belongs to the UI, so logs go to a file.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Log file location under the data directory.
pub fn log_path(data_dir: &Path) -> PathBuf {
  data_dir.join("logs").join("deckview.log")
}

fn env_filter() -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber, writing to `path`.
///
/// Falls back to stderr when the file can not be opened so startup never
/// blocks on logging.
pub fn init(path: &Path) {
  let opened = path
    .parent()
    .map(std::fs::create_dir_all)
    .unwrap_or(Ok(()))
    .and_then(|_| {
      std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    });

  match opened {
    Ok(file) => {
      let (non_blocking, guard) = tracing_appender::non_blocking(file);
      tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking)
        .init();
      let _ = LOG_GUARD.set(guard);
      tracing::info!(path = %path.display(), "logging initialized");
    }
    Err(e) => {
      tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
      tracing::warn!(error = %e, "failed to open log file; using stderr");
    }
  }
}
