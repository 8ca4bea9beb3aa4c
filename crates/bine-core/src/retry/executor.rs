//! Retry execution loop

use std::fmt::Display;
use std::future::Future;
use std::time::Instant;
use tracing::{debug, error, warn};

use super::strategies::{calculate_delay, AlwaysRetry, RetryPredicate};
use super::RetryError;
use crate::types::RetryPolicy;

/// Retry `op` under `policy`, retrying every error
pub async fn retry_with_policy<F, Fut, T, E>(policy: &RetryPolicy, op: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    RetryExecutor::new(policy.clone()).execute(op).await
}

/// Runs an async operation until it succeeds, the predicate refuses a retry,
/// or the policy's attempts are used up
///
/// ```rust
/// use bine_core::retry::{ClosurePredicate, RetryExecutor};
/// use bine_core::types::RetryPolicy;
///
/// let executor = RetryExecutor::new(RetryPolicy::default())
///     .named("download")
///     .with_predicate(ClosurePredicate::new(|e: &std::io::Error| {
///         e.kind() == std::io::ErrorKind::TimedOut
///     }));
/// ```
pub struct RetryExecutor<P = AlwaysRetry> {
    policy: RetryPolicy,
    predicate: P,
    operation: String,
    jitter: bool,
}

impl RetryExecutor<AlwaysRetry> {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            predicate: AlwaysRetry,
            operation: "retry".to_string(),
            jitter: true,
        }
    }
}

impl<P> RetryExecutor<P> {
    /// Operation name used in log records
    pub fn named(mut self, operation: impl Into<String>) -> Self {
        self.operation = operation.into();
        self
    }

    pub fn with_predicate<P2>(self, predicate: P2) -> RetryExecutor<P2> {
        RetryExecutor {
            policy: self.policy,
            predicate,
            operation: self.operation,
            jitter: self.jitter,
        }
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub async fn execute<F, Fut, T, E>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: RetryPredicate<E>,
    {
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            let err = match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(operation = %self.operation, attempt, "succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if !self.predicate.should_retry(&err) {
                return Err(RetryError::NonRetryable(err));
            }

            if attempt >= max_attempts {
                error!(
                    operation = %self.operation,
                    attempts = attempt,
                    error = %err,
                    "all retry attempts exhausted"
                );
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    source: err,
                    total_duration: start.elapsed(),
                });
            }

            let delay = calculate_delay(&self.policy, attempt, self.jitter);
            warn!(
                operation = %self.operation,
                attempt,
                error = %err,
                delay_ms = delay.as_millis() as u64,
                "attempt failed, will retry"
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        Err(RetryError::NoAttempts)
    }
}
