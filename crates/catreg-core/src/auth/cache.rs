use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use super::{AccessToken, TokenProvider, TokenSource};
use crate::retry::Failure;

/// Caches the last token from `S`. Refreshes when there is none or when it
/// expires within `skew`; tokens without an expiry are kept for the process lifetime.
#[derive(Debug)]
pub struct CachedTokenProvider<S> {
    source: S,
    skew: Duration,
    cached: Mutex<Option<AccessToken>>,
}

impl<S: TokenSource> CachedTokenProvider<S> {
    pub const DEFAULT_SKEW: Duration = Duration::from_secs(60);

    pub fn new(source: S) -> Self {
        Self::with_skew(source, Self::DEFAULT_SKEW)
    }

    pub fn with_skew(source: S, skew: Duration) -> Self {
        Self {
            source,
            skew,
            cached: Mutex::new(None),
        }
    }

    fn is_fresh(&self, token: &AccessToken, now: SystemTime) -> bool {
        match token.expires_at {
            None => true,
            Some(exp) => exp
                .checked_sub(self.skew)
                .map_or(false, |refresh_at| now < refresh_at),
        }
    }
}

impl<S: TokenSource> TokenProvider for CachedTokenProvider<S> {
    fn bearer_token(&self) -> Result<String, Failure> {
        let mut cached = self.cached.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(token) = cached.as_ref() {
            if self.is_fresh(token, SystemTime::now()) {
                return Ok(token.secret.clone());
            }
            tracing::debug!("cached token expiring, refreshing");
        }
        let token = self
            .source
            .acquire()
            .map_err(|e| Failure::auth(e.to_string()))?;
        let secret = token.secret.clone();
        *cached = Some(token);
        Ok(secret)
    }
}
