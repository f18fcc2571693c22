//! Decide whether a captured failure is worth retrying.

use once_cell::sync::Lazy;
use regex::Regex;

use super::failure::{Failure, FailureKind, IoKind, NetworkStatus, SocketCode};

/// HTTP statuses treated as transient on protocol and remote-service failures.
const TRANSIENT_HTTP_STATUSES: [u16; 4] = [500, 502, 503, 408];

/// Remote-service error codes (carried as `<code>..</code>`) that indicate a transient condition.
const TRANSIENT_ERROR_CODES: [&str; 5] = [
    "InternalError",
    "ServerBusy",
    "OperationTimedOut",
    "TableServerOutOfMemory",
    "TableBeingDeleted",
];

static ERROR_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<code>(\w+)</code>").expect("error code pattern is valid")
});

/// Anything that can tell transient failures from permanent ones.
pub trait TransientClassifier {
    fn is_transient(&self, failure: &Failure) -> bool;
}

/// Rules for HTTP calls: connection-level statuses, 5xx/408 responses,
/// refused or timed-out sockets, transient remote-service codes and bare I/O errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransientClassifier;

impl TransientClassifier for HttpTransientClassifier {
    fn is_transient(&self, failure: &Failure) -> bool {
        is_transient(Some(failure))
    }
}

/// True if `failure` or its directly-wrapped inner failure matches a transient rule.
/// Only one level of nesting is inspected. `None` is never transient.
pub fn is_transient(failure: Option<&Failure>) -> bool {
    match failure {
        None => false,
        Some(f) => check(f) || f.inner().map_or(false, check),
    }
}

fn check(f: &Failure) -> bool {
    match f.kind() {
        FailureKind::Network(status) => network_status_is_transient(*status),
        FailureKind::Protocol => f.status_code().map_or(false, status_is_transient),
        FailureKind::Socket(code) => {
            matches!(code, SocketCode::ConnectionRefused | SocketCode::TimedOut)
        }
        FailureKind::RemoteRequest { item_statuses } => {
            let code_is_transient = f
                .inner()
                .and_then(|inner| extract_error_code(inner.message()))
                .map_or(false, |code| TRANSIENT_ERROR_CODES.contains(&code));
            code_is_transient || item_statuses.iter().any(|s| status_is_transient(*s))
        }
        FailureKind::RemoteClient => f.status_code().map_or(false, status_is_transient),
        FailureKind::Io(kind) => *kind == IoKind::Generic && f.inner().is_none(),
        FailureKind::Redirect(_) | FailureKind::Auth | FailureKind::Other => false,
    }
}

fn network_status_is_transient(status: NetworkStatus) -> bool {
    matches!(
        status,
        NetworkStatus::ConnectionClosed
            | NetworkStatus::Timeout
            | NetworkStatus::RequestCanceled
            | NetworkStatus::KeepAliveFailure
            | NetworkStatus::PipelineFailure
            | NetworkStatus::ReceiveFailure
            | NetworkStatus::ConnectFailure
            | NetworkStatus::SendFailure
    )
}

fn status_is_transient(code: u16) -> bool {
    TRANSIENT_HTTP_STATUSES.contains(&code)
}

/// First `<code>..</code>` token in `text`, tag matched case-insensitively.
pub fn extract_error_code(text: &str) -> Option<&str> {
    ERROR_CODE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
