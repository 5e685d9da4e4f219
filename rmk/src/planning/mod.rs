//! Makeover planning pipeline
//!
//! - [`repair`]: bounded JSON repair of raw model text
//! - [`validator`]: item coercion and confidence scoring
//! - [`budget`]: greedy allocation under the ceiling
//! - [`links`]: shopping search URLs
//! - [`orchestrator`]: sequences the stages for one request

pub mod budget;
pub mod links;
mod orchestrator;
mod outcome;
pub mod repair;
pub mod validator;

pub use budget::{Allocation, allocate};
pub use links::LinkSynthesizer;
pub use orchestrator::{MakeoverRequest, Orchestrator, PreparedPrompt};
pub use outcome::{DropReason, ErrorBody, MakeoverOutcome, MakeoverResponse, PlanWarning, Stage};
pub use repair::{DecodeOutcome, RepairAction, decode};
pub use validator::{ValidatedResponse, validate_response};
