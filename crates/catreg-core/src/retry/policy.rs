use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::classify::{HttpTransientClassifier, TransientClassifier};
use super::failure::Failure;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry; surface the failure.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("max_attempts must be at least 1")]
    NoAttempts,
    #[error("min backoff {min:?} exceeds max backoff {max:?}")]
    InvertedBackoff { min: Duration, max: Duration },
}

/// Capped exponential backoff driven by a transient-fault classifier.
///
/// Built once at start-up and shared read-only by every call the executor makes.
#[derive(Clone)]
pub struct RetryPolicy {
    classifier: Arc<dyn TransientClassifier + Send + Sync>,
    max_attempts: u32,
    min_backoff: Duration,
    max_backoff: Duration,
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("min_backoff", &self.min_backoff)
            .field("max_backoff", &self.max_backoff)
            .finish_non_exhaustive()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            classifier: Arc::new(HttpTransientClassifier),
            max_attempts: 5,
            min_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new<C>(
        classifier: C,
        max_attempts: u32,
        min_backoff: Duration,
        max_backoff: Duration,
    ) -> Result<Self, PolicyError>
    where
        C: TransientClassifier + Send + Sync + 'static,
    {
        if max_attempts == 0 {
            return Err(PolicyError::NoAttempts);
        }
        if min_backoff > max_backoff {
            return Err(PolicyError::InvertedBackoff {
                min: min_backoff,
                max: max_backoff,
            });
        }
        Ok(Self {
            classifier: Arc::new(classifier),
            max_attempts,
            min_backoff,
            max_backoff,
        })
    }

    /// Maximum number of attempts (including the first).
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_transient(&self, failure: &Failure) -> bool {
        self.classifier.is_transient(failure)
    }

    /// Delay before the attempt following failed attempt `attempt` (1-based):
    /// `min * 2^(attempt-1)`, clamped to `[min, max]`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = 1u32 << attempt.saturating_sub(1).min(16);
        self.min_backoff
            .saturating_mul(exp)
            .clamp(self.min_backoff, self.max_backoff)
    }

    /// Decide what to do after attempt `attempt` (1-based) failed with `failure`.
    pub fn decide(&self, attempt: u32, failure: &Failure) -> RetryDecision {
        if !self.is_transient(failure) || attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.backoff(attempt))
    }
}
