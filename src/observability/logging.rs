//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the process-wide `tracing` subscriber once, at startup
//! - Stdout output plus an optional size-rotated log file
//! - `RUST_LOG` overrides the configured level
//!
//! The returned [`WorkerGuard`] flushes the file writer on drop and must be
//! held for the life of the process.

use std::path::Path;

use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {path}: {source}")]
    Directory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber described by `config`.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let writer = rotating_writer(Path::new(path), config)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(writer);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .try_init()?;

    if let Some(path) = &config.file {
        tracing::info!(
            path = %path,
            max_bytes = config.max_bytes,
            max_backups = config.max_backups,
            "File logging enabled"
        );
    }

    Ok(guard)
}

/// Writer that rotates `path` to `path.1`, `path.2`, ... once it reaches `max_bytes`.
pub fn rotating_writer(path: &Path, config: &LoggingConfig) -> Result<FileRotate<AppendCount>, LoggingError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| LoggingError::Directory {
            path: parent.display().to_string(),
            source,
        })?;
    }

    Ok(FileRotate::new(
        path,
        AppendCount::new(config.max_backups),
        ContentLimit::Bytes(config.max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    ))
}
