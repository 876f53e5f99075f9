//! Prompt definition files.

use super::Format;
use crate::models::{CompositePrompt, PromptFragment, Variable};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// A composite prompt described as data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PromptDefinition {
    /// Fragments in render order.
    #[serde(default)]
    pub fragments: Vec<FragmentDefinition>,
}

/// A single fragment entry in a definition file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FragmentDefinition {
    /// Template text with `{name}` placeholders.
    pub content: String,
    /// Initial substitutions.
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl PromptDefinition {
    /// Parses a definition from text in the given format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the text is not a valid definition.
    pub fn parse(text: &str, format: Format) -> Result<Self> {
        match format {
            Format::Toml => {
                toml::from_str(text).map_err(|e| Error::InvalidInput(format!("Invalid TOML: {e}")))
            },
            Format::Json => serde_json::from_str(text)
                .map_err(|e| Error::InvalidInput(format!("Invalid JSON: {e}"))),
            Format::Yaml => serde_yaml_ng::from_str(text)
                .map_err(|e| Error::InvalidInput(format!("Invalid YAML: {e}"))),
        }
    }

    /// Builds a composite prompt from this definition.
    ///
    /// Each fragment is built with [`PromptFragment::with_variables`], so a key
    /// listed twice renders exactly as it would from code.
    #[must_use]
    pub fn build(&self) -> CompositePrompt {
        self.fragments
            .iter()
            .map(|definition| {
                PromptFragment::with_variables(
                    definition.content.as_str(),
                    definition.variables.clone(),
                )
                .into_shared()
            })
            .collect()
    }
}

/// Loads a definition file, choosing the parser from its extension.
///
/// # Errors
///
/// Returns an error if the extension is unsupported, the file cannot be read,
/// or its contents do not parse.
pub fn load_definition(path: &Path) -> Result<PromptDefinition> {
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
        operation: "read_definition_file".to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;

    let definition = PromptDefinition::parse(&text, format)?;
    tracing::debug!(
        path = %path.display(),
        %format,
        fragments = definition.fragments.len(),
        "loaded prompt definition"
    );
    Ok(definition)
}
