//! Errors from a single model call
//!
//! The orchestrator never retries; it maps these onto
//! [`MakeoverError`](crate::error::MakeoverError) as either a timeout or an
//! unavailable model. Only the provider transport loop looks at
//! [`LlmError::is_transient`], and only when `llm.max-retries` is above zero.

use std::time::Duration;
use thiserror::Error;

use super::transport::is_retryable_status;

#[derive(Debug, Error)]
pub enum LlmError {
    /// 429 from the provider; surfaced as-is, never slept on
    #[error("Rate limited by provider, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("Provider returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Provider answered 2xx with a body we could not use
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("No response within {0:?}")]
    Timeout(Duration),

    #[error("Malformed provider JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown provider or missing API key
    #[error("Client configuration error: {0}")]
    Configuration(String),

    /// Saved response for the replay client could not be read
    #[error("Replay file error: {0}")]
    Io(#[from] std::io::Error),
}

impl LlmError {
    /// Whether resending the same request could succeed
    ///
    /// Dropped connections and 5xx/529 overloads are transient. A timeout has
    /// already spent the whole call budget and a 429 names its own wait, so
    /// neither is resent.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Network(_) => true,
            LlmError::ApiError { status, .. } => is_retryable_status(*status),
            LlmError::RateLimited { .. }
            | LlmError::Timeout(_)
            | LlmError::InvalidResponse(_)
            | LlmError::Json(_)
            | LlmError::Configuration(_)
            | LlmError::Io(_) => false,
        }
    }
}
