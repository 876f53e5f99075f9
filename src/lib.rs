//! # Promptweave
//!
//! Composable prompt fragments with named placeholder substitution.
//!
//! A [`PromptFragment`] is template text with `{name}` placeholders plus an
//! ordered list of [`Variable`]s. A [`CompositePrompt`] aggregates fragments
//! and joins their rendered output with a single space.
//!
//! ## Example
//!
//! ```rust
//! use promptweave::{CompositePrompt, PromptFragment, Variable};
//!
//! let general = PromptFragment::with_variables(
//!     "Tell me about {topic}.",
//!     vec![Variable::new("topic", "artificial intelligence")],
//! )
//! .into_shared();
//! let history = PromptFragment::with_variables(
//!     "What is the history of {subject}?",
//!     vec![Variable::new("subject", "the Roman Empire")],
//! )
//! .into_shared();
//!
//! let prompt = CompositePrompt::new(vec![general, history.clone()]);
//! history.update_variable("subject", "ancient Greece");
//!
//! assert_eq!(
//!     prompt.render(),
//!     "Tell me about artificial intelligence. What is the history of ancient Greece?"
//! );
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod io;
pub mod models;
pub mod observability;

// Re-exports for convenience
pub use config::PromptweaveConfig;
pub use models::{CompositePrompt, FragmentId, PromptFragment, SharedFragment, Variable};

/// Error type for promptweave operations.
///
/// Rendering and variable updates never fail; errors come only from loading
/// configuration or definition files, parsing CLI input and setting up logging.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed definition files, unknown formats, bad `--set` arguments |
/// | `OperationFailed` | File I/O errors, config parse errors, logging init failures |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for promptweave operations.
pub type Result<T> = std::result::Result<T, Error>;
