//! Retry with exponential backoff
//!
//! Wraps one HTTP request to the completion service. Transient failures
//! (`429`, `5xx`, transport errors, timeouts) are retried according to a
//! [`RetryPolicy`]; everything else is handed back to the caller untouched.
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | HTTP 2xx / 3xx | Return immediately |
//! | HTTP 4xx except 429 | Return immediately |
//! | HTTP 429 / 5xx | Retry; return the last response once attempts run out |
//! | Timeout / connection error | Retry; raise the last error once attempts run out |

use crate::config::RetryPolicy;
use crate::LlmError;
use reqwest::{Client, Request, Response, StatusCode};

/// Sends `request`, retrying transient failures per `policy`
///
/// Makes at most `policy.max_retries + 1` attempts. Attempt `n` (counting from
/// zero) waits `base_delay_ms * 2^(n-1)` before it is sent, and each attempt is
/// cancelled once `timeout_ms` elapses without a response.
///
/// # Returns
///
/// * `Ok(Response)` - A non-retryable response, or the last retryable one
/// * `Err(LlmError)` - The error from the final attempt
pub async fn fetch_with_retry(
    client: &Client,
    request: Request,
    policy: &RetryPolicy,
) -> Result<Response, LlmError> {
    let url = request.url().to_string();
    let max_attempts = policy.max_attempts();
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = policy.backoff_delay(attempt);
            tracing::debug!(
                "Retrying {} ({}/{}) in {:?}",
                url,
                attempt,
                policy.max_retries,
                delay
            );
            tokio::time::sleep(delay).await;
        }

        let is_last = attempt + 1 >= max_attempts;
        let current = request.try_clone().ok_or(LlmError::UnclonableRequest)?;

        // Dropping the in-flight future on timeout cancels the request
        let error = match tokio::time::timeout(policy.timeout(), client.execute(current)).await {
            Ok(Ok(response)) => {
                let status = response.status();
                if is_retryable(status) && !is_last {
                    tracing::warn!("{} returned {}, retrying", url, status);
                    attempt += 1;
                    continue;
                }
                return Ok(response);
            }
            Ok(Err(source)) => LlmError::Transport {
                url: url.clone(),
                source,
            },
            Err(_) => LlmError::Timeout {
                url: url.clone(),
                timeout_ms: policy.timeout_ms,
            },
        };

        if is_last {
            return Err(error);
        }

        tracing::warn!("{}, retrying", error);
        attempt += 1;
    }
}

/// Returns true for statuses worth another attempt
pub fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
