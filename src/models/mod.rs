//! Data models for promptweave.

mod prompt;

pub use prompt::{
    CompositePrompt, FragmentId, FragmentSnapshot, INTROSPECT_HEADER, PromptFragment,
    SharedFragment, Variable,
};
