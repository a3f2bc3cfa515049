//! Retry logic.
//!
//! A [`RetryPolicy`] runs an operation up to `max_attempts` times, pausing
//! between attempts. Each failure is an [`AttemptError`]; the caller's
//! classifier decides whether it is worth another attempt. Non-retryable
//! failures stop the loop at once.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::schema::{BackoffKind, ReadinessConfig, SubmissionConfig};
use crate::resilience::backoff::retry_delay;

/// Failure of a single upstream attempt.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// No response within the per-attempt deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Connection, TLS or body transfer failure.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered, but not with the expected status.
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The request itself is malformed; retrying cannot help.
    #[error("invalid request: {0}")]
    Build(String),
}

/// Longest response body kept in a [`AttemptError::Status`].
const MAX_ERROR_BODY: usize = 512;

impl AttemptError {
    /// Consume an unexpected response into a status error.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
            body.push_str("...");
        }
        AttemptError::Status { status, body }
    }

    /// Transport and timeout failures are always transient. Status failures
    /// are transient unless `fail_fast_on_client_error` is set and the
    /// status is 4xx.
    pub fn is_retryable(&self, fail_fast_on_client_error: bool) -> bool {
        match self {
            AttemptError::Timeout(_) | AttemptError::Transport(_) => true,
            AttemptError::Status { status, .. } => {
                !(fail_fast_on_client_error && status.is_client_error())
            }
            AttemptError::Build(_) => false,
        }
    }
}

impl From<reqwest::Error> for AttemptError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            AttemptError::Build(err.to_string())
        } else {
            AttemptError::Transport(err)
        }
    }
}

/// Terminal failure of a retried operation.
#[derive(Debug, Error)]
pub enum RetryError {
    #[error("gave up after {attempts} attempts, last error: {last}")]
    Exhausted { attempts: u32, last: AttemptError },

    #[error("attempt {attempt} failed permanently: {error}")]
    Aborted { attempt: u32, error: AttemptError },
}

impl RetryError {
    /// Number of attempts actually made.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
            RetryError::Aborted { attempt, .. } => *attempt,
        }
    }
}

/// Bounded retry with a pause between attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff: BackoffKind,
}

impl RetryPolicy {
    /// Same pause before every retry.
    pub fn fixed(max_attempts: u32, delay_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay_ms: delay_ms,
            max_delay_ms: delay_ms,
            backoff: BackoffKind::Fixed,
        }
    }

    /// Pause before retry number `retry` (1-based).
    pub fn delay_before(&self, retry: u32) -> Duration {
        retry_delay(self.backoff, retry, self.base_delay_ms, self.max_delay_ms)
    }

    /// Run `op` until it succeeds, fails permanently, or the budget is spent.
    ///
    /// `op` receives the 1-based attempt number. There is no pause after the
    /// final attempt.
    pub async fn run<T, F, Fut, C>(
        &self,
        operation: &str,
        mut op: F,
        is_retryable: C,
    ) -> Result<T, RetryError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, AttemptError>>,
        C: Fn(&AttemptError) -> bool,
    {
        let mut attempt = 1;
        loop {
            let error = match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !is_retryable(&error) {
                tracing::error!(operation, attempt, error = %error, "Attempt failed permanently");
                return Err(RetryError::Aborted { attempt, error });
            }

            if attempt >= self.max_attempts {
                tracing::warn!(operation, attempt, error = %error, "Attempt failed, budget exhausted");
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: error,
                });
            }

            let delay = self.delay_before(attempt);
            tracing::warn!(
                operation,
                attempt,
                max_attempts = self.max_attempts,
                retry_in_ms = delay.as_millis() as u64,
                error = %error,
                "Attempt failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl From<&ReadinessConfig> for RetryPolicy {
    fn from(config: &ReadinessConfig) -> Self {
        RetryPolicy::fixed(config.max_attempts, config.interval_ms)
    }
}

impl From<&SubmissionConfig> for RetryPolicy {
    fn from(config: &SubmissionConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay_ms: config.delay_ms,
            max_delay_ms: config.max_delay_ms,
            backoff: config.backoff,
        }
    }
}
