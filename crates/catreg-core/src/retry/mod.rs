//! Transient-fault classification and retry policy.
//!
//! Network failures are captured as a tagged [`Failure`], classified by a pure
//! [`TransientClassifier`], and retried with capped exponential backoff so that
//! every catalog call shares one consistent policy.

mod classify;
mod failure;
mod policy;
mod run;

pub use classify::{extract_error_code, is_transient, HttpTransientClassifier, TransientClassifier};
pub use failure::{Failure, FailureKind, IoKind, NetworkStatus, RedirectFault, SocketCode};
pub use policy::{PolicyError, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
