//! Retry executor
//!
//! Runs a fallible async operation under a [`RetryPolicy`]: bounded attempts,
//! exponential backoff without jitter, and an early exit for failures that
//! cannot succeed on another attempt.

use crate::ports::stage_client::StageError;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};
use triage_domain::RetryPolicy;

/// Errors that know whether another attempt could succeed.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for StageError {
    fn is_retryable(&self) -> bool {
        StageError::is_retryable(self)
    }
}

/// Run `op` until it succeeds, fails permanently, or attempts run out.
///
/// The last error is returned unchanged.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: &RetryPolicy, label: &str, op: F) -> Result<T, E>
where
    E: Retryable + Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_with_backoff_observed(policy, label, |_, _, _| {}, op).await
}

/// [`retry_with_backoff`] with a callback invoked before each backoff sleep.
///
/// `on_retry` receives the 1-based number of the failed attempt, its error and
/// the delay about to be slept.
pub async fn retry_with_backoff_observed<T, E, F, Fut, O>(
    policy: &RetryPolicy,
    label: &str,
    mut on_retry: O,
    mut op: F,
) -> Result<T, E>
where
    E: Retryable + Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    O: FnMut(u32, &E, Duration),
{
    let attempts = policy.attempts();
    let mut attempt = 0;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => {
                error!("{} failed with a non-retryable error: {}", label, e);
                return Err(e);
            }
            Err(e) => {
                attempt += 1;
                if attempt >= attempts {
                    error!("{} failed after {} attempts: {}", label, attempts, e);
                    return Err(e);
                }
                let delay = policy.delay_for(attempt - 1);
                warn!(
                    "{} attempt {}/{} failed: {}; retrying in {:?}",
                    label, attempt, attempts, e, delay
                );
                on_retry(attempt, &e, delay);
                tokio::time::sleep(delay).await;
            }
        }
    }
}
