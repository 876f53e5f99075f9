//! Configuration management.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration for promptweave.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptweaveConfig {
    /// Logging settings from the config file.
    pub logging: LoggingSettings,
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive (e.g. `info`, `promptweave=debug`).
    pub level: Option<String>,
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// Optional log file path.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    logging: Option<LoggingSettings>,
}

impl PromptweaveConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or has unexpected types.
    pub fn parse(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        let config = Self::parse(&contents)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/promptweave/` on macOS)
    /// 2. XDG config dir (`~/.config/promptweave/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found or loadable.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs
                .config_dir()
                .join("promptweave")
                .join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("promptweave")
                .join("config.toml"),
        ];

        candidates
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| Self::load_from_file(path).ok())
            .unwrap_or_default()
    }

    /// Resolves configuration for the CLI.
    ///
    /// An explicit `path` (from `--config` or `PROMPTWEAVE_CONFIG_PATH`) wins,
    /// otherwise the default locations are searched.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be loaded.
    pub fn resolve(path: Option<&Path>) -> crate::Result<Self> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Ok(Self::load_default()),
        }
    }

    /// Converts a `ConfigFile` to `PromptweaveConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }
}
