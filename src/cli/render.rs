//! Render and introspect CLI commands.

use crate::io::load_definition;
use crate::models::{CompositePrompt, PromptFragment};
use crate::{Error, Result};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

/// Output format for `introspect`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Header line plus one `ID: ..., Content: ...` line per fragment.
    #[default]
    Text,
    /// JSON array of `{ "id", "content" }` objects.
    Json,
}

impl OutputFormat {
    /// Parses output format from string, falling back to [`OutputFormat::Text`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// A `--set [INDEX:]KEY=VALUE` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableOverride {
    /// Zero-based fragment index.
    pub index: usize,
    /// Variable key.
    pub key: String,
    /// Variable value.
    pub value: String,
}

impl FromStr for VariableOverride {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((target, value)) = s.split_once('=') else {
            return Err(Error::InvalidInput(format!(
                "Invalid variable '{s}'. Use --set [INDEX:]KEY=VALUE"
            )));
        };

        let (index, key) = match target.split_once(':') {
            Some((index, key)) => {
                let index = index.trim().parse::<usize>().map_err(|_| {
                    Error::InvalidInput(format!("Invalid fragment index '{index}' in '{s}'"))
                })?;
                (index, key)
            },
            None => (0, target),
        };

        Ok(Self {
            index,
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Where a composite comes from: a definition file, inline fragments and overrides.
#[derive(Debug, Clone, Default)]
pub struct PromptSource {
    /// Optional definition file.
    pub file: Option<PathBuf>,
    /// Inline fragment texts appended after the file's fragments.
    pub fragments: Vec<String>,
    /// Variable overrides applied last.
    pub overrides: Vec<VariableOverride>,
}

impl PromptSource {
    /// Assembles the composite.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition file cannot be loaded, no fragments
    /// were given, or an override targets a fragment that does not exist.
    pub fn build(&self) -> Result<CompositePrompt> {
        let mut composite = match &self.file {
            Some(path) => load_definition(path)?.build(),
            None => CompositePrompt::default(),
        };

        for content in &self.fragments {
            composite.add_fragment(PromptFragment::new(content.as_str()));
        }

        if composite.is_empty() {
            return Err(Error::InvalidInput(
                "No fragments given. Provide a definition file or --fragment TEXT".to_string(),
            ));
        }

        for over in &self.overrides {
            let fragment = composite.fragments().get(over.index).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Fragment index {} out of range (have {} fragments)",
                    over.index,
                    composite.len()
                ))
            })?;
            fragment.update_variable(over.key.as_str(), over.value.as_str());
        }

        Ok(composite)
    }
}

/// Writes the rendered composite followed by a newline.
///
/// # Errors
///
/// Returns an error if the composite cannot be built or `out` cannot be written.
pub fn cmd_render<W: Write>(
    source: &PromptSource,
    out: &mut W,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let composite = source.build()?;
    writeln!(out, "{}", composite.render())?;
    Ok(())
}

/// Writes the composite's introspection listing.
///
/// # Errors
///
/// Returns an error if the composite cannot be built, serialization fails, or
/// `out` cannot be written.
pub fn cmd_introspect<W: Write>(
    source: &PromptSource,
    format: OutputFormat,
    out: &mut W,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let composite = source.build()?;
    match format {
        OutputFormat::Text => composite.introspect_to(out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &composite.snapshots())?;
            writeln!(out)?;
        },
    }
    Ok(())
}
