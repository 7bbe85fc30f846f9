//! Prompt system for the askdocs pipeline.
//!
//! Provides the grounded-answer prompt:
//! - a built-in default definition (system instructions + user template)
//! - optional YAML-based overrides
//! - Handlebars template rendering

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_grounded_prompt;
pub use loader::load_definition;
pub use types::{BuiltPrompt, PromptDefinition};
