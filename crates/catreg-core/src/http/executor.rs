//! Resilient request execution: retry policy around a redirect-following send loop.

use super::request::{OutboundRequest, RequestTarget, AUTHORIZATION, CLIENT_REQUEST_ID};
use super::response::InboundResponse;
use super::transport::Transport;
use crate::auth::TokenProvider;
use crate::retry::{run_with_retry, Failure, RedirectFault, RetryPolicy};

/// The only status treated as a redirect.
pub const REDIRECT_STATUS: u16 = 302;

/// Redirect hops followed within one attempt before giving up.
pub const DEFAULT_MAX_REDIRECTS: u32 = 5;

/// Executes logical requests to completion.
///
/// Each attempt (up to the policy's budget) follows the server's redirect
/// chain itself; every hop is a new request carrying a freshly fetched bearer
/// token and a new correlation id.
pub struct HttpExecutor<T, P> {
    transport: T,
    tokens: P,
    policy: RetryPolicy,
    max_redirects: u32,
}

impl<T: Transport, P: TokenProvider> HttpExecutor<T, P> {
    pub fn new(transport: T, tokens: P, policy: RetryPolicy) -> Self {
        Self {
            transport,
            tokens,
            policy,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    pub fn with_max_redirects(mut self, max_redirects: u32) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs one logical request. `build` is called once per attempt to get the
    /// starting target; `body` is sent as JSON on every hop.
    ///
    /// Returns the first non-redirect response with a status below 400. Error
    /// statuses become protocol failures; the policy decides whether to retry them.
    pub fn execute<F>(&self, build: F, body: Option<&[u8]>) -> Result<InboundResponse, Failure>
    where
        F: Fn() -> RequestTarget,
    {
        run_with_retry(&self.policy, |attempt| {
            let result = self.attempt(attempt, build(), body);
            if let Err(e) = &result {
                if let Some(text) = e.body() {
                    tracing::warn!(attempt, status = ?e.status_code(), body = %text, "error response body");
                }
            }
            result
        })
    }

    fn attempt(
        &self,
        attempt: u32,
        start: RequestTarget,
        body: Option<&[u8]>,
    ) -> Result<InboundResponse, Failure> {
        let mut target = start;
        let mut hops = 0u32;
        loop {
            let request = self.prepare(&target, body)?;
            tracing::debug!(
                attempt,
                hop = hops,
                method = %request.method(),
                url = %request.url(),
                request_id = request.header(CLIENT_REQUEST_ID).unwrap_or(""),
                "sending request"
            );
            let response = self.transport.send(&request)?;

            if response.status() == REDIRECT_STATUS {
                if hops >= self.max_redirects {
                    return Err(Failure::redirect(
                        RedirectFault::TooManyHops,
                        format!("more than {} redirects from {}", self.max_redirects, request.url()),
                    ));
                }
                let location = response.location().ok_or_else(|| {
                    Failure::redirect(
                        RedirectFault::MissingLocation,
                        format!("302 from {} without Location", request.url()),
                    )
                })?;
                let next = resolve_location(target.url(), location)?;
                tracing::debug!(attempt, from = %target.url(), to = %next, "following redirect");
                target = target.redirect_to(next);
                hops += 1;
                continue;
            }

            if response.status() >= 400 {
                let status = response.status();
                let text = response.status_text().to_string();
                return Err(Failure::protocol(status, text, Some(response.into_body_text())));
            }
            return Ok(response);
        }
    }

    /// A brand-new request for `target`: fresh token, fresh correlation id.
    fn prepare(&self, target: &RequestTarget, body: Option<&[u8]>) -> Result<OutboundRequest, Failure> {
        let token = self.tokens.bearer_token()?;
        let request = OutboundRequest::new(target)
            .with_header(AUTHORIZATION, format!("Bearer {}", token))
            .with_header(CLIENT_REQUEST_ID, uuid::Uuid::new_v4().to_string());
        Ok(match body {
            Some(b) => request.with_json_body(b),
            None => request,
        })
    }
}

/// Resolve a `Location` value (absolute or relative) against the URL that produced it.
pub fn resolve_location(base: &str, location: &str) -> Result<String, Failure> {
    let invalid = |e: url::ParseError| {
        Failure::redirect(
            RedirectFault::InvalidLocation,
            format!("cannot resolve Location {:?} against {}: {}", location, base, e),
        )
    };
    let base = url::Url::parse(base).map_err(invalid)?;
    base.join(location).map(String::from).map_err(invalid)
}
