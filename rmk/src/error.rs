//! Makeover planning error taxonomy
//!
//! Every fatal condition the orchestrator can hit maps to exactly one
//! [`ErrorKind`]. Non-fatal degradations are warnings, see
//! [`crate::planning::PlanWarning`].

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::llm::LlmError;

/// Coarse error category exposed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Invalid style name or out-of-range budget
    ConfigurationError,
    /// The model did not answer within the configured timeout
    ModelTimeout,
    /// The model call failed for any other reason
    ModelUnavailable,
    /// Nothing usable survived validation of the model response
    PlanGenerationFailure,
    /// The enclosing request was cancelled while the model call was in flight
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigurationError => "configuration_error",
            Self::ModelTimeout => "model_timeout",
            Self::ModelUnavailable => "model_unavailable",
            Self::PlanGenerationFailure => "plan_generation_failure",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fatal errors raised while planning a makeover
#[derive(Debug, Error)]
pub enum MakeoverError {
    #[error("Unknown style '{name}'. Supported: {supported}")]
    UnknownStyle { name: String, supported: String },

    #[error("Budget {ceiling} is outside the allowed range {min}-{max}")]
    BudgetOutOfRange { ceiling: Decimal, min: Decimal, max: Decimal },

    #[error("Model did not respond within {0:?}")]
    ModelTimeout(Duration),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Plan generation failed: {0}")]
    PlanGeneration(String),

    #[error("Request cancelled before the model responded")]
    Cancelled,
}

impl MakeoverError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownStyle { .. } | Self::BudgetOutOfRange { .. } => ErrorKind::ConfigurationError,
            Self::ModelTimeout(_) => ErrorKind::ModelTimeout,
            Self::ModelUnavailable(_) => ErrorKind::ModelUnavailable,
            Self::PlanGeneration(_) => ErrorKind::PlanGenerationFailure,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Whether a caller-level retry could plausibly succeed
    ///
    /// Configuration errors and unreadable responses are deterministic for the
    /// same input; transport failures are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::ModelTimeout | ErrorKind::ModelUnavailable)
    }
}

impl From<LlmError> for MakeoverError {
    fn from(err: LlmError) -> Self {
        debug!(error = %err, "MakeoverError::from: mapping LlmError");
        match err {
            LlmError::Timeout(duration) => Self::ModelTimeout(duration),
            other => Self::ModelUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = MakeoverError::UnknownStyle {
            name: "zen".to_string(),
            supported: "modern".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::ConfigurationError);
        assert!(!err.is_retryable());

        let err = MakeoverError::BudgetOutOfRange {
            ceiling: Decimal::from(10),
            min: Decimal::from(500),
            max: Decimal::from(50_000),
        };
        assert_eq!(err.kind(), ErrorKind::ConfigurationError);
        assert!(err.to_string().contains("500-50000"));

        assert_eq!(MakeoverError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            MakeoverError::PlanGeneration("empty".to_string()).kind(),
            ErrorKind::PlanGenerationFailure
        );
    }

    #[test]
    fn test_from_llm_error() {
        let err: MakeoverError = LlmError::Timeout(Duration::from_secs(5)).into();
        assert_eq!(err.kind(), ErrorKind::ModelTimeout);
        assert!(err.is_retryable());

        let err: MakeoverError = LlmError::ApiError {
            status: 503,
            message: "overloaded".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::ModelUnavailable);
        assert!(err.to_string().contains("overloaded"));
    }

    #[test]
    fn test_error_kind_serde() {
        let json = serde_json::to_string(&ErrorKind::PlanGenerationFailure).unwrap();
        assert_eq!(json, "\"plan_generation_failure\"");
        assert_eq!(ErrorKind::ModelTimeout.to_string(), "model_timeout");
    }
}
