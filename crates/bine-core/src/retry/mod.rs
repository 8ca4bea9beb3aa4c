//! Policy-based retry execution
//!
//! Used by the HTTP layer to retry transport failures. Which errors are
//! retryable is decided by a `RetryPredicate`; everything else propagates on
//! the first attempt.
//!
//! # Example
//!
//! ```rust,no_run
//! use bine_core::retry::{retry_with_policy, RetryError};
//! use bine_core::types::RetryPolicy;
//!
//! async fn example() -> Result<String, RetryError<std::io::Error>> {
//!     let policy = RetryPolicy::default();
//!
//!     retry_with_policy(&policy, || async {
//!         Ok("success".to_string())
//!     }).await
//! }
//! ```

mod executor;
mod strategies;

pub use executor::{retry_with_policy, RetryExecutor};
pub use strategies::{calculate_delay, AlwaysRetry, ClosurePredicate, RetryPredicate};

use std::fmt;
use std::time::Duration;

/// Errors that end a retried operation
#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error
    Exhausted {
        attempts: u32,
        source: E,
        total_duration: Duration,
    },

    /// The predicate refused to retry this error
    NonRetryable(E),

    /// The policy allowed no attempts at all
    NoAttempts,
}

impl<E> RetryError<E> {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }

    pub fn is_non_retryable(&self) -> bool {
        matches!(self, RetryError::NonRetryable(_))
    }

    /// Number of attempts made
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
            RetryError::NonRetryable(_) => 1,
            RetryError::NoAttempts => 0,
        }
    }

    /// The error from the last attempt
    pub fn into_source(self) -> Option<E> {
        match self {
            RetryError::Exhausted { source, .. } | RetryError::NonRetryable(source) => Some(source),
            RetryError::NoAttempts => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Exhausted {
                attempts,
                source,
                total_duration,
            } => write!(
                f,
                "retry exhausted after {} attempts over {:.2}s: {}",
                attempts,
                total_duration.as_secs_f64(),
                source
            ),
            RetryError::NonRetryable(source) => write!(f, "non-retryable error: {}", source),
            RetryError::NoAttempts => write!(f, "retry policy allows no attempts"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RetryError::Exhausted { source, .. } | RetryError::NonRetryable(source) => Some(source),
            RetryError::NoAttempts => None,
        }
    }
}
