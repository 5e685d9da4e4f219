//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for makeover planning.
//!
//! Template loading chain:
//! 1. `.roommakeover/prompts/{name}.pmt` (user override)
//! 2. `prompts/{name}.pmt` (project default)
//! 3. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution.

mod builder;
pub mod embedded;
mod loader;

pub use builder::{BuiltPrompt, PromptBuilder, PromptContext};
pub use loader::PromptLoader;
