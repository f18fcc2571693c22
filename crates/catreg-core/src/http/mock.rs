//! Scripted transport and token provider for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use super::request::OutboundRequest;
use super::response::InboundResponse;
use super::transport::Transport;
use crate::auth::TokenProvider;
use crate::retry::Failure;

pub(crate) fn response(status: u16, headers: &[(&str, &str)], body: &str) -> InboundResponse {
    InboundResponse::new(
        status,
        "",
        headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        body.as_bytes().to_vec(),
    )
}

/// Replays queued results in order; once empty, repeats `fallback` if set.
pub(crate) struct ScriptedTransport {
    script: RefCell<VecDeque<Result<InboundResponse, Failure>>>,
    fallback: Option<Result<InboundResponse, Failure>>,
    sent: RefCell<Vec<OutboundRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(script: Vec<Result<InboundResponse, Failure>>) -> Self {
        Self {
            script: RefCell::new(script.into()),
            fallback: None,
            sent: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn repeating(resp: InboundResponse) -> Self {
        Self {
            fallback: Some(Ok(resp)),
            ..Self::new(Vec::new())
        }
    }

    pub(crate) fn repeating_failure(failure: Failure) -> Self {
        Self {
            fallback: Some(Err(failure)),
            ..Self::new(Vec::new())
        }
    }

    pub(crate) fn sent(&self) -> Vec<OutboundRequest> {
        self.sent.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &OutboundRequest) -> Result<InboundResponse, Failure> {
        self.sent.borrow_mut().push(request.clone());
        match self.script.borrow_mut().pop_front() {
            Some(r) => r,
            None => self
                .fallback
                .clone()
                .unwrap_or_else(|| Err(Failure::other("script exhausted"))),
        }
    }
}

/// Hands out tokens from a list (the last one repeats), or always fails.
pub(crate) struct StaticTokens {
    tokens: Vec<String>,
    next: Cell<usize>,
}

impl StaticTokens {
    pub(crate) fn fixed(token: &str) -> Self {
        Self::sequence(&[token])
    }

    pub(crate) fn sequence(tokens: &[&str]) -> Self {
        Self {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            next: Cell::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        Self::sequence(&[])
    }
}

impl TokenProvider for StaticTokens {
    fn bearer_token(&self) -> Result<String, Failure> {
        let i = self.next.get();
        self.next.set(i + 1);
        self.tokens
            .get(i.min(self.tokens.len().saturating_sub(1)))
            .cloned()
            .ok_or_else(|| Failure::auth("no token configured"))
    }
}
