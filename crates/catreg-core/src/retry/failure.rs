//! Failure captured from a single network call, classified before it is retried or surfaced.

use std::fmt;

/// Connection-level status reported by the transport when no usable HTTP response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    ConnectionClosed,
    Timeout,
    RequestCanceled,
    KeepAliveFailure,
    PipelineFailure,
    ReceiveFailure,
    ConnectFailure,
    SendFailure,
    NameResolutionFailure,
    SecureChannelFailure,
    Unknown,
}

/// Socket error code attached by the transport when the OS reported one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketCode {
    ConnectionRefused,
    TimedOut,
    ConnectionReset,
    Other(i32),
}

/// Flavour of an I/O failure. Only `Generic` is considered a transport hiccup;
/// the others are specific conditions (missing file, unloadable resource).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoKind {
    Generic,
    FileLoad,
    FileNotFound,
    EndOfStream,
}

/// Why a redirect chain could not be followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectFault {
    MissingLocation,
    InvalidLocation,
    TooManyHops,
}

/// Tag of a [`Failure`]. Classification matches on this, never on runtime types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport failed before a response was available.
    Network(NetworkStatus),
    /// Server answered with an error status (`status_code` is set).
    Protocol,
    /// Low-level socket error.
    Socket(SocketCode),
    /// Structured remote-service call failure. The inner failure's message may
    /// embed a `<code>..</code>` token; `item_statuses` are per-item statuses
    /// from a batched response.
    RemoteRequest { item_statuses: Vec<u16> },
    /// Structured client-side failure of a remote-service call (`status_code` is set).
    RemoteClient,
    Io(IoKind),
    Redirect(RedirectFault),
    /// Bearer token could not be acquired.
    Auth,
    Other,
}

/// A failed network call: tag, message, optional HTTP details and at most
/// one wrapped inner failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    kind: FailureKind,
    message: String,
    status_code: Option<u16>,
    status_text: Option<String>,
    body: Option<String>,
    inner: Option<Box<Failure>>,
}

impl Failure {
    fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            status_text: None,
            body: None,
            inner: None,
        }
    }

    pub fn network(status: NetworkStatus, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Network(status), message)
    }

    /// Error response from the server. Empty bodies are stored as `None`.
    pub fn protocol(status_code: u16, status_text: impl Into<String>, body: Option<String>) -> Self {
        let status_text = status_text.into();
        let mut f = Self::new(
            FailureKind::Protocol,
            format!("HTTP {} {}", status_code, status_text).trim_end().to_string(),
        );
        f.status_code = Some(status_code);
        f.status_text = Some(status_text).filter(|s| !s.is_empty());
        f.body = body.filter(|b| !b.is_empty());
        f
    }

    pub fn socket(code: SocketCode, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Socket(code), message)
    }

    pub fn remote_request(item_statuses: Vec<u16>, message: impl Into<String>) -> Self {
        Self::new(FailureKind::RemoteRequest { item_statuses }, message)
    }

    pub fn remote_client(status_code: u16, message: impl Into<String>) -> Self {
        let mut f = Self::new(FailureKind::RemoteClient, message);
        f.status_code = Some(status_code);
        f
    }

    pub fn io(kind: IoKind, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Io(kind), message)
    }

    pub fn redirect(fault: RedirectFault, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Redirect(fault), message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Auth, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Other, message)
    }

    /// Wraps `inner` as the directly-nested cause.
    pub fn with_inner(mut self, inner: Failure) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }

    pub fn kind(&self) -> &FailureKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status_text.as_deref()
    }

    /// Response body of a protocol failure, kept for diagnostics.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn inner(&self) -> Option<&Failure> {
        self.inner.as_deref()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FailureKind::Network(status) => write!(f, "network failure ({:?}): {}", status, self.message),
            FailureKind::Socket(code) => write!(f, "socket error ({:?}): {}", code, self.message),
            FailureKind::Redirect(fault) => write!(f, "redirect failure ({:?}): {}", fault, self.message),
            FailureKind::Auth => write!(f, "token acquisition failed: {}", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner
            .as_deref()
            .map(|inner| inner as &(dyn std::error::Error + 'static))
    }
}
