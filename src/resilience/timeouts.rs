//! Timeout enforcement.
//!
//! Every upstream call runs under a deadline; expiry surfaces as
//! [`AttemptError::Timeout`], distinct from transport failures.

use std::future::Future;
use std::time::Duration;

use crate::resilience::retries::AttemptError;

/// Run `fut` under `deadline`.
pub async fn with_deadline<T, F>(deadline: Duration, fut: F) -> Result<T, AttemptError>
where
    F: Future<Output = Result<T, AttemptError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(AttemptError::Timeout(deadline)),
    }
}
