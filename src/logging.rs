// File: src/logging.rs
use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::Result;

pub const LOG_FILE: &str = "floppy_engine.log";

/// Keeps the background log writer alive; logs flush when it drops.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub log_path: PathBuf,
}

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Human-readable logs on stderr. `RUST_LOG` overrides `level`.
pub fn init_stderr(level: &str) {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter_for(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    // Ignore error if a global subscriber is already set (e.g., when running in tests)
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Logs to `<dir>/floppy_engine.log`, for drivers whose stdout is a protocol.
/// The file is truncated on every start.
pub fn init_file(dir: &Path, level: &str) -> Result<LoggingGuard> {
    fs::create_dir_all(dir)?;
    let log_path = dir.join(LOG_FILE);
    let file = fs::File::create(&log_path)?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter_for(level))
        .with_ansi(false)
        .with_writer(writer)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(LoggingGuard {
        _guard: guard,
        log_path,
    })
}
