//! CLI command implementations.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `render` | Print the rendered composite prompt |
//! | `introspect` | List each fragment's id and rendered content |
//!
//! # Example Usage
//!
//! ```bash
//! # Render a definition file
//! promptweave render prompt.toml
//!
//! # Inline fragments with variable overrides
//! promptweave render --fragment "Tell me about {topic}." --set topic=rust
//!
//! # Override a variable in the second fragment, print JSON introspection
//! promptweave introspect prompt.toml --set 1:subject="ancient Greece" --format json
//! ```

mod render;

pub use render::{
    OutputFormat, PromptSource, VariableOverride, cmd_introspect, cmd_render,
};
