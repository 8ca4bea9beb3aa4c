//! Retry delay strategies and predicates

use crate::types::{RetryPolicy, RetryStrategy};
use rand::Rng;
use std::time::Duration;

/// Delay before the attempt following `attempt` (1-indexed).
///
/// ```rust
/// use bine_core::retry::calculate_delay;
/// use bine_core::types::{RetryPolicy, RetryStrategy};
///
/// let policy = RetryPolicy {
///     max_attempts: 3,
///     strategy: RetryStrategy::ExponentialBackoff,
///     backoff_multiplier: 2.0,
///     initial_delay_ms: 500,
///     max_delay_ms: 10000,
/// };
///
/// assert_eq!(calculate_delay(&policy, 1, false).as_millis(), 500);
/// assert_eq!(calculate_delay(&policy, 2, false).as_millis(), 1000);
/// ```
pub fn calculate_delay(policy: &RetryPolicy, attempt: u32, jitter: bool) -> Duration {
    let index = attempt.saturating_sub(1);

    let base_ms = match policy.strategy {
        RetryStrategy::None => 0,
        RetryStrategy::FixedDelay => policy.initial_delay_ms,
        RetryStrategy::ExponentialBackoff => {
            (policy.initial_delay_ms as f64 * policy.backoff_multiplier.powf(index as f64)) as u64
        }
        RetryStrategy::LinearBackoff => policy.initial_delay_ms.saturating_mul(index as u64 + 1),
    };

    let capped_ms = base_ms.min(policy.max_delay_ms);

    // Up to 25% on top of the capped delay.
    let delay_ms = if jitter && capped_ms > 0 {
        capped_ms + rand::rng().random_range(0..=capped_ms / 4)
    } else {
        capped_ms
    };

    Duration::from_millis(delay_ms)
}

/// Decides whether an error is worth another attempt
pub trait RetryPredicate<E: ?Sized>: Send + Sync {
    fn should_retry(&self, error: &E) -> bool;
}

/// Retry every error
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRetry;

impl<E: ?Sized> RetryPredicate<E> for AlwaysRetry {
    fn should_retry(&self, _error: &E) -> bool {
        true
    }
}

/// Predicate backed by a closure
pub struct ClosurePredicate<F> {
    predicate: F,
}

impl<F> ClosurePredicate<F> {
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<E, F> RetryPredicate<E> for ClosurePredicate<F>
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn should_retry(&self, error: &E) -> bool {
        (self.predicate)(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn policy(strategy: RetryStrategy) -> RetryPolicy {
        RetryPolicy {
            max_attempts: 5,
            strategy,
            backoff_multiplier: 2.0,
            initial_delay_ms: 100,
            max_delay_ms: 1000,
        }
    }

    #[test]
    fn test_strategies() {
        let none = policy(RetryStrategy::None);
        assert_eq!(calculate_delay(&none, 3, true), Duration::ZERO);

        let fixed = policy(RetryStrategy::FixedDelay);
        assert_eq!(calculate_delay(&fixed, 4, false), Duration::from_millis(100));

        let linear = policy(RetryStrategy::LinearBackoff);
        assert_eq!(calculate_delay(&linear, 3, false), Duration::from_millis(300));

        let exp = policy(RetryStrategy::ExponentialBackoff);
        assert_eq!(calculate_delay(&exp, 1, false), Duration::from_millis(100));
        assert_eq!(calculate_delay(&exp, 3, false), Duration::from_millis(400));
        // 100 * 2^5 = 3200, capped
        assert_eq!(calculate_delay(&exp, 6, false), Duration::from_millis(1000));
    }

    #[test]
    fn test_jitter_bounds() {
        let fixed = policy(RetryStrategy::FixedDelay);
        for _ in 0..50 {
            let delay = calculate_delay(&fixed, 1, true);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(125));
        }
    }

    #[test]
    fn test_closure_predicate() {
        let predicate = ClosurePredicate::new(|err: &io::Error| err.kind() == io::ErrorKind::TimedOut);
        assert!(predicate.should_retry(&io::Error::new(io::ErrorKind::TimedOut, "t")));
        assert!(!predicate.should_retry(&io::Error::new(io::ErrorKind::NotFound, "n")));
        assert!(AlwaysRetry.should_retry(&io::Error::other("x")));
    }
}
