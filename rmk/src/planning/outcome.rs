//! Planning stages, warnings and terminal outcomes

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::MakeoverPlan;
use crate::error::{ErrorKind, MakeoverError};

/// Pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    DetectionReceived,
    InventoryClassified,
    PromptBuilt,
    ModelInvoked,
    ResponseValidated,
    BudgetAllocated,
    LinksSynthesized,
    Complete,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DetectionReceived => "detection_received",
            Self::InventoryClassified => "inventory_classified",
            Self::PromptBuilt => "prompt_built",
            Self::ModelInvoked => "model_invoked",
            Self::ResponseValidated => "response_validated",
            Self::BudgetAllocated => "budget_allocated",
            Self::LinksSynthesized => "links_synthesized",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why items were left out of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Missing name, description or a usable price
    Invalid,
    /// Did not fit in the remaining budget
    OverBudget,
}

/// Non-fatal degradation of a plan
#[derive(Debug, Clone, PartialEq)]
pub enum PlanWarning {
    /// No suggested item fit under the ceiling
    BudgetTooLow { ceiling: Decimal, cheapest: Decimal },
    ItemsDropped { count: usize, reason: DropReason },
    LowConfidence { confidence: f64, threshold: f64 },
}

impl PlanWarning {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BudgetTooLow { .. } => "budget_too_low",
            Self::ItemsDropped { .. } => "items_dropped",
            Self::LowConfidence { .. } => "low_confidence",
        }
    }
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BudgetTooLow { ceiling, cheapest } => write!(
                f,
                "budget_too_low: no suggested item fits within {} (cheapest was {})",
                ceiling, cheapest
            ),
            Self::ItemsDropped {
                count,
                reason: DropReason::Invalid,
            } => write!(f, "items_dropped: {} malformed item(s) removed from the model response", count),
            Self::ItemsDropped {
                count,
                reason: DropReason::OverBudget,
            } => write!(f, "items_dropped: {} item(s) skipped to stay within budget", count),
            Self::LowConfidence { confidence, threshold } => write!(
                f,
                "low_confidence: plan confidence {:.2} is below {:.2}",
                confidence, threshold
            ),
        }
    }
}

/// Terminal result of one planning request
#[derive(Debug)]
pub enum MakeoverOutcome {
    Success(MakeoverPlan),
    PartialSuccess { plan: MakeoverPlan, warnings: Vec<PlanWarning> },
    Failure { stage: Stage, error: MakeoverError },
}

impl MakeoverOutcome {
    pub(crate) fn from_plan(plan: MakeoverPlan, warnings: Vec<PlanWarning>) -> Self {
        if warnings.is_empty() {
            Self::Success(plan)
        } else {
            Self::PartialSuccess { plan, warnings }
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::PartialSuccess { .. } => "partial_success",
            Self::Failure { .. } => "failure",
        }
    }

    pub fn plan(&self) -> Option<&MakeoverPlan> {
        match self {
            Self::Success(plan) | Self::PartialSuccess { plan, .. } => Some(plan),
            Self::Failure { .. } => None,
        }
    }

    pub fn warnings(&self) -> &[PlanWarning] {
        match self {
            Self::PartialSuccess { warnings, .. } => warnings,
            _ => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

/// Error section of the response envelope
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
    pub stage: Stage,
}

/// JSON envelope handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct MakeoverResponse {
    pub status: &'static str,
    pub plan: Option<MakeoverPlan>,
    pub warnings: Vec<String>,
    pub error: Option<ErrorBody>,
}

impl From<MakeoverOutcome> for MakeoverResponse {
    fn from(outcome: MakeoverOutcome) -> Self {
        let status = outcome.status();
        match outcome {
            MakeoverOutcome::Success(plan) => Self {
                status,
                plan: Some(plan),
                warnings: Vec::new(),
                error: None,
            },
            MakeoverOutcome::PartialSuccess { plan, warnings } => Self {
                status,
                plan: Some(plan),
                warnings: warnings.iter().map(ToString::to_string).collect(),
                error: None,
            },
            MakeoverOutcome::Failure { stage, error } => Self {
                status,
                plan: None,
                warnings: Vec::new(),
                error: Some(ErrorBody {
                    kind: error.kind(),
                    message: error.to_string(),
                    stage,
                }),
            },
        }
    }
}
