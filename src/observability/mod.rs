//! Observability: logging setup for the CLI.
//!
//! The library only emits `tracing` events. Binaries call [`init`] (or
//! [`init_from_config`]) once to install a subscriber.

mod logging;

pub use logging::{LOG_FILTER_ENV, LOG_FORMAT_ENV, LogFormat, LoggingConfig};

use crate::config::LoggingSettings;
use crate::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Options for initialization supplied by the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
    /// Whether verbose output was requested via CLI.
    pub verbose: bool,
}

static OBSERVABILITY_INIT: OnceLock<()> = OnceLock::new();

/// Initializes logging from config settings with env overrides.
///
/// # Errors
///
/// Returns an error if logging has already been initialized or the log file
/// cannot be opened.
pub fn init_from_config(settings: &LoggingSettings, options: InitOptions) -> Result<()> {
    init(LoggingConfig::from_settings(Some(settings), options.verbose))
}

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Returns an error if logging has already been initialized or the log file
/// cannot be opened.
pub fn init(config: LoggingConfig) -> Result<()> {
    if OBSERVABILITY_INIT.get().is_some() {
        return Err(Error::OperationFailed {
            operation: "observability_init".to_string(),
            cause: "observability already initialized".to_string(),
        });
    }

    match (&config.file, config.format) {
        (Some(log_file), LogFormat::Json) => {
            let writer = AppendLog::open(log_file)?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_current_span(true)
                        .with_target(true),
                )
                .with(config.filter)
                .try_init()
                .map_err(subscriber_error)?;
        },
        (Some(log_file), LogFormat::Pretty) => {
            let writer = AppendLog::open(log_file)?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(true),
                )
                .with(config.filter)
                .try_init()
                .map_err(subscriber_error)?;
        },
        (None, LogFormat::Json) => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(io::stderr)
                        .with_current_span(true)
                        .with_target(true),
                )
                .with(config.filter)
                .try_init()
                .map_err(subscriber_error)?;
        },
        (None, LogFormat::Pretty) => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(io::stderr)
                        .with_target(true),
                )
                .with(config.filter)
                .try_init()
                .map_err(subscriber_error)?;
        },
    }

    OBSERVABILITY_INIT
        .set(())
        .map_err(|()| Error::OperationFailed {
            operation: "observability_init".to_string(),
            cause: "failed to mark observability initialized".to_string(),
        })
}

/// Log file shared by every event the subscriber writes.
#[derive(Clone)]
struct AppendLog {
    file: Arc<Mutex<File>>,
}

impl AppendLog {
    /// Opens `path` for appending, creating missing parent directories.
    fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| Error::OperationFailed {
                operation: "create_log_dir".to_string(),
                cause: format!("{}: {e}", dir.display()),
            })?;
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map(|file| Self {
                file: Arc::new(Mutex::new(file)),
            })
            .map_err(|e| Error::OperationFailed {
                operation: "open_log_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })
    }

    fn locked(&self) -> io::Result<MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl Write for AppendLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.locked()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.locked()?.flush()
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for AppendLog {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Maps a rejected `try_init` (another subscriber is installed) to [`Error`].
#[allow(clippy::needless_pass_by_value)]
fn subscriber_error(e: tracing_subscriber::util::TryInitError) -> Error {
    Error::OperationFailed {
        operation: "observability_init".to_string(),
        cause: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_log_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("logs").join("pw.log");

        let mut log = AppendLog::open(&path).unwrap();
        log.write_all(b"line\n").unwrap();
        log.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "line\n");
    }

    #[test]
    fn test_append_log_keeps_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pw.log");
        std::fs::write(&path, "first\n").unwrap();

        let mut log = AppendLog::open(&path).unwrap();
        let mut clone = log.clone();
        log.write_all(b"second\n").unwrap();
        clone.write_all(b"third\n").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "first\nsecond\nthird\n"
        );
    }

    #[test]
    fn test_append_log_rejects_directory_path() {
        let dir = tempfile::tempdir().unwrap();

        let err = AppendLog::open(dir.path()).err().unwrap();

        assert!(err.to_string().contains("open_log_file"));
    }
}
