//! Replay client
//!
//! Returns a previously captured model response from disk. Used for offline
//! runs and for exercising the validator against real model output.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError};

/// Client that answers every request with the contents of one file
pub struct ReplayClient {
    path: PathBuf,
}

impl ReplayClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!(?path, "ReplayClient::new: called");
        Self { path }
    }
}

#[async_trait]
impl LlmClient for ReplayClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(path = ?self.path, "ReplayClient::complete: called");
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(CompletionResponse::text(content))
    }

    fn name(&self) -> &str {
        "replay"
    }
}
