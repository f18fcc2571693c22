//! Bearer tokens for catalog calls.
//!
//! The executor asks a [`TokenProvider`] for a token on every physical attempt
//! and every redirect hop. [`CachedTokenProvider`] keeps the last token from a
//! [`TokenSource`] and only goes back to the source when it is missing or about
//! to expire.

mod cache;
mod source;

use std::time::SystemTime;

use crate::retry::Failure;

pub use cache::CachedTokenProvider;
pub use source::{parse_token_output, CommandTokenSource, StaticTokenSource};

/// Supplies the current bearer token (without the `Bearer ` prefix).
pub trait TokenProvider {
    fn bearer_token(&self) -> Result<String, Failure>;
}

impl<P: TokenProvider + ?Sized> TokenProvider for &P {
    fn bearer_token(&self) -> Result<String, Failure> {
        (**self).bearer_token()
    }
}

/// A token and, when known, the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub secret: String,
    pub expires_at: Option<SystemTime>,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>, expires_at: Option<SystemTime>) -> Self {
        Self {
            secret: secret.into(),
            expires_at,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("environment variable {0} is not set")]
    MissingEnv(String),
    #[error("failed to run token command {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("token command {program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("token source returned an empty token")]
    EmptyToken,
    #[error("invalid token JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where fresh tokens come from (interactive sign-in, a CLI, a fixed secret).
pub trait TokenSource {
    fn acquire(&self) -> Result<AccessToken, AuthError>;
}

impl<S: TokenSource + ?Sized> TokenSource for Box<S> {
    fn acquire(&self) -> Result<AccessToken, AuthError> {
        (**self).acquire()
    }
}
