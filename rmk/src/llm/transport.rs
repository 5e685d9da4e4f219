//! HTTP send loop shared by the providers

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use tracing::{debug, warn};

use super::LlmError;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 500 | 502 | 503 | 504 | 529)
}

/// Delay before retry `attempt` (1-based), doubling each time and saturating
pub(crate) fn backoff_ms(attempt: u32) -> u64 {
    INITIAL_BACKOFF_MS.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
}

/// Map a reqwest failure, keeping timeouts distinct
pub(crate) fn map_send_error(e: reqwest::Error, timeout: Duration) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout(timeout)
    } else {
        LlmError::Network(e)
    }
}

/// POST with up to `max_retries` extra attempts on network errors and 5xx
///
/// `build` is called once per attempt since a `RequestBuilder` is consumed by
/// `send`. Returns the first successful response.
pub(crate) async fn send_with_retry<F>(max_retries: u32, timeout: Duration, build: F) -> Result<Response, LlmError>
where
    F: Fn() -> RequestBuilder,
{
    debug!(%max_retries, "send_with_retry: called");
    let mut last_error = None;
    for attempt in 0..=max_retries {
        if attempt > 0 {
            let backoff = backoff_ms(attempt);
            warn!(attempt, backoff_ms = backoff, "send_with_retry: retrying after transient error");
            tokio::time::sleep(Duration::from_millis(backoff)).await;
        }

        let response = match build().send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(attempt, error = %e, "send_with_retry: send failed");
                let err = map_send_error(e, timeout);
                if !err.is_transient() {
                    return Err(err);
                }
                last_error = Some(err);
                continue;
            }
        };

        let status = response.status().as_u16();

        if status == 429 {
            debug!("send_with_retry: rate limited (429)");
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            let err = LlmError::ApiError { status, message };
            if err.is_transient() && attempt < max_retries {
                debug!(attempt, status, "send_with_retry: transient provider error");
                last_error = Some(err);
                continue;
            }
            debug!(%status, "send_with_retry: provider error");
            return Err(err);
        }

        debug!("send_with_retry: success");
        return Ok(response);
    }

    Err(last_error.unwrap_or_else(|| LlmError::InvalidResponse("Max retries exceeded".to_string())))
}
