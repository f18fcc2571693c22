//! HTTP plumbing for catalog calls.
//!
//! Request and response values, a blocking libcurl transport and the
//! [`HttpExecutor`], which combines the retry policy with manual redirect
//! following so each hop is re-authenticated.

mod executor;
#[cfg(test)]
pub(crate) mod mock;
mod parse;
mod request;
mod response;
mod transport;

pub use executor::{resolve_location, HttpExecutor, DEFAULT_MAX_REDIRECTS, REDIRECT_STATUS};
pub use request::{
    Method, OutboundRequest, RequestTarget, AUTHORIZATION, CLIENT_REQUEST_ID, CONTENT_TYPE_JSON,
};
pub use response::InboundResponse;
pub use transport::{CurlTransport, Transport};
