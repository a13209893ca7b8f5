//! Retry configuration for the executor.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;

use super::backoff::{JitterSource, backoff};
use super::classify::is_retryable_status;

type StatusPredicate = dyn Fn(StatusCode) -> bool + Send + Sync;

/// Decides which HTTP status codes are worth retrying.
///
/// A pure predicate over the status code. The default retries 429 and
/// every 5xx except 501/505 (see [`is_retryable_status`]).
///
/// # Example
///
/// ```
/// use wacloud::transport::RetryPolicy;
/// use http::StatusCode;
///
/// let policy = RetryPolicy::new(|status| status == StatusCode::SERVICE_UNAVAILABLE);
/// assert!(policy.should_retry(StatusCode::SERVICE_UNAVAILABLE));
/// assert!(!policy.should_retry(StatusCode::BAD_GATEWAY));
/// ```
#[derive(Clone)]
pub struct RetryPolicy {
    predicate: Arc<StatusPredicate>,
}

impl RetryPolicy {
    /// Creates a policy from a status predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(StatusCode) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// A policy that never retries on status.
    #[must_use]
    pub fn never() -> Self {
        Self::new(|_| false)
    }

    /// Returns true if a response with `status` should be retried.
    #[must_use]
    pub fn should_retry(&self, status: StatusCode) -> bool {
        (self.predicate)(status)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(is_retryable_status)
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RetryPolicy(..)")
    }
}

/// Configuration for the executor's retry loop.
///
/// # Defaults
///
/// - `max_retries`: 3 (four attempts in total)
/// - `base_backoff`: 200 milliseconds
/// - `max_backoff`: 3 seconds
/// - `retry_policy`: [`RetryPolicy::default`]
///
/// # Example
///
/// ```
/// use wacloud::transport::ExecutorConfig;
/// use std::time::Duration;
///
/// let config = ExecutorConfig::new()
///     .with_max_retries(5)
///     .with_base_backoff(Duration::from_millis(100))
///     .with_max_backoff(Duration::from_secs(2));
/// assert_eq!(config.total_attempts(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Retries performed after the initial attempt.
    ///
    /// Zero disables retries entirely.
    pub max_retries: u32,

    /// Delay scale for the first retry.
    pub base_backoff: Duration,

    /// Upper bound on any single delay, applied before jitter.
    pub max_backoff: Duration,

    /// Status codes that trigger a retry.
    pub retry_policy: RetryPolicy,
}

impl ExecutorConfig {
    /// Default number of retries.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Default base backoff (200 milliseconds).
    pub const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(200);

    /// Default maximum backoff (3 seconds).
    pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(3);

    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            base_backoff: Self::DEFAULT_BASE_BACKOFF,
            max_backoff: Self::DEFAULT_MAX_BACKOFF,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Sets the number of retries after the initial attempt.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the base backoff.
    ///
    /// Zero delay is supported (useful for testing) but not recommended for
    /// production as it creates a tight retry loop.
    #[must_use]
    pub const fn with_base_backoff(mut self, delay: Duration) -> Self {
        self.base_backoff = delay;
        self
    }

    /// Sets the maximum backoff.
    #[must_use]
    pub const fn with_max_backoff(mut self, delay: Duration) -> Self {
        self.max_backoff = delay;
        self
    }

    /// Sets the status retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Total number of attempts, including the initial one.
    #[must_use]
    pub const fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Returns true if another attempt may follow attempt number `attempt`.
    ///
    /// # Arguments
    ///
    /// * `attempt` - The zero-based attempt that just failed (0 = initial attempt)
    #[must_use]
    pub const fn has_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Computes the jittered delay before the retry following `attempt`.
    #[must_use]
    pub fn delay_for_retry(&self, attempt: u32, jitter: &dyn JitterSource) -> Duration {
        backoff(attempt, self.base_backoff, self.max_backoff, jitter)
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::new()
    }
}
