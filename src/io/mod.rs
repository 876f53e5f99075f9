//! Prompt definition input.
//!
//! Loads composite prompts described in structured files. Input only: nothing
//! is ever written back.
//!
//! # Supported Formats
//!
//! | Format | Extensions |
//! |--------|------------|
//! | TOML | `.toml` |
//! | JSON | `.json` |
//! | YAML | `.yaml`, `.yml` |

mod definition;

pub use definition::{FragmentDefinition, PromptDefinition, load_definition};

use crate::{Error, Result};
use std::path::Path;
use std::str::FromStr;

/// Supported definition file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// TOML document with a `[[fragments]]` array.
    Toml,
    /// JSON object with a `fragments` array.
    Json,
    /// YAML mapping with a `fragments` sequence.
    Yaml,
}

impl Format {
    /// Returns the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Detects format from file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is missing or not recognized.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some(ext) => Err(Error::InvalidInput(format!(
                "Unsupported file extension: .{ext}"
            ))),
            None => Err(Error::InvalidInput(
                "Cannot determine format: file has no extension".to_string(),
            )),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::InvalidInput(format!("Unknown format: {s}"))),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
