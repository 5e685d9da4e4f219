//! RoomMakeover - budget-aware room makeover planning
//!
//! Turns an object-detection result, a design style and a budget ceiling into
//! a structured redecoration plan with shopping links.
//!
//! # Core Concepts
//!
//! - **Deterministic prompts**: identical inputs render byte-identical instructions
//! - **Bounded repair**: one repair pass over model output, never a retry loop
//! - **Exact money**: prices and budgets are decimals, never floats
//! - **Graded outcomes**: every degradation is a warning with a lower confidence
//!
//! # Modules
//!
//! - [`inventory`] - Room type classification from detections
//! - [`styles`] - The built-in design style catalog
//! - [`prompts`] - Prompt templates and the prompt builder
//! - [`llm`] - LLM client trait and providers
//! - [`planning`] - Validation, budget allocation, links and the orchestrator
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod inventory;
pub mod llm;
pub mod planning;
pub mod prompts;
pub mod styles;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use domain::{
    BudgetConstraint, BudgetLimits, Currency, Detection, ItemCategory, MakeoverPlan, PlannedItem, RoomInventory,
    RoomType, ShoppingLink, StyleName, StyleProfile, SuggestedItem,
};
pub use error::{ErrorKind, MakeoverError};
pub use inventory::InventoryClassifier;
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, ReplayClient, create_client};
pub use planning::{
    MakeoverOutcome, MakeoverRequest, MakeoverResponse, Orchestrator, PlanWarning, Stage, validate_response,
};
pub use prompts::{PromptBuilder, PromptLoader};
pub use styles::StyleCatalog;
