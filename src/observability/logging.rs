//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive.
pub const LOG_FILTER_ENV: &str = "PROMPTWEAVE_LOG";

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "PROMPTWEAVE_LOG_FORMAT";

const DEFAULT_LEVEL: &str = "warn";
const VERBOSE_LEVEL: &str = "debug";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format string, falling back to [`LogFormat::Pretty`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Event filter.
    pub filter: EnvFilter,
    /// Output format.
    pub format: LogFormat,
    /// Log file; standard error when `None`.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Builds logging config from file settings with environment overrides.
    ///
    /// Filter precedence: `PROMPTWEAVE_LOG`, `RUST_LOG`, the config file level,
    /// then `debug` when verbose or `warn` otherwise. `PROMPTWEAVE_LOG_FORMAT`
    /// overrides the config file format. Blank variables count as unset.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        Self::from_settings_with(settings, verbose, |name| std::env::var(name).ok())
    }

    /// Same as [`from_settings`](Self::from_settings), reading variables
    /// through `lookup` instead of the process environment.
    #[must_use]
    pub fn from_settings_with<F>(
        settings: Option<&LoggingSettings>,
        verbose: bool,
        lookup: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let directive = var(LOG_FILTER_ENV)
            .or_else(|| var(EnvFilter::DEFAULT_ENV))
            .or_else(|| settings.and_then(|s| s.level.clone()));
        let format = var(LOG_FORMAT_ENV).or_else(|| settings.and_then(|s| s.format.clone()));

        Self::build(
            directive.as_deref(),
            format.as_deref(),
            settings.and_then(|s| s.file.clone()),
            verbose,
        )
    }

    /// Builds logging config from explicit values, ignoring the environment.
    #[must_use]
    pub fn build(
        directive: Option<&str>,
        format: Option<&str>,
        file: Option<PathBuf>,
        verbose: bool,
    ) -> Self {
        let fallback = if verbose { VERBOSE_LEVEL } else { DEFAULT_LEVEL };
        let filter = directive
            .and_then(|d| EnvFilter::try_new(d).ok())
            .unwrap_or_else(|| EnvFilter::new(fallback));

        Self {
            filter,
            format: format.map(LogFormat::parse).unwrap_or_default(),
            file,
        }
    }
}
