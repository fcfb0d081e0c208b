use std::path::{Path, PathBuf};

use papers_core::config_file::LOG_ENV;
use papers_core::{FileStore, KeyValueStore, MemoryStore};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Log directory: `~/.cache/papers/logs/`.
pub fn log_dir() -> Option<PathBuf> {
    let dir = dirs::cache_dir()?.join("papers").join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Route tracing output to a daily log file; the terminal is in raw mode so
/// nothing may be written to stderr. Keep the guard alive until exit.
pub fn init_logging() -> Option<WorkerGuard> {
    let dir = log_dir()?;
    let appender = tracing_appender::rolling::daily(&dir, "papers-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(filter);
    tracing_subscriber::registry().with(layer).try_init().ok()?;
    Some(guard)
}

/// Store for the done-set and theme. Falls back to memory when the data
/// directory cannot be created, so marks last for this session only.
pub fn open_store(data_dir: &Path) -> Box<dyn KeyValueStore> {
    match std::fs::create_dir_all(data_dir) {
        Ok(()) => Box::new(FileStore::new(data_dir)),
        Err(e) => {
            tracing::warn!(dir = %data_dir.display(), error = %e, "data dir unavailable, using memory store");
            Box::new(MemoryStore::new())
        }
    }
}
