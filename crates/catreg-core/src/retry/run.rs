//! Retry loop: run a closure until success, a permanent failure, or the attempt budget is spent.

use super::failure::Failure;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f` until it succeeds or the retry policy says to stop.
///
/// `f` receives the 1-based attempt number. On a transient failure with attempts
/// left, blocks the current thread for the backoff delay and tries again.
/// Permanent failures and the last failure of an exhausted budget are returned unchanged.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, Failure>
where
    F: FnMut(u32) -> Result<T, Failure>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, &e) {
                RetryDecision::NoRetry => {
                    if policy.is_transient(&e) {
                        tracing::warn!(attempt, error = %e, "retries exhausted");
                    }
                    return Err(e);
                }
                RetryDecision::RetryAfter(d) => {
                    tracing::warn!(attempt, delay_ms = d.as_millis() as u64, error = %e, "transient failure, retrying");
                    std::thread::sleep(d);
                    attempt += 1;
                }
            },
        }
    }
}
