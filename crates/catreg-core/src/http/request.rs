//! Request values. A request is immutable; every physical attempt and every
//! redirect hop builds a new one.

use std::fmt;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const AUTHORIZATION: &str = "Authorization";
pub const CLIENT_REQUEST_ID: &str = "x-ms-client-request-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a logical operation is sent: URL and method, nothing attempt-specific.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    url: String,
    method: Method,
}

impl RequestTarget {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Same method, new URL.
    pub fn redirect_to(&self, url: impl Into<String>) -> Self {
        Self::new(self.method, url)
    }
}

/// One physical request as handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    url: String,
    method: Method,
    headers: Vec<(String, String)>,
    content_type: Option<&'static str>,
    body: Option<Vec<u8>>,
}

impl OutboundRequest {
    pub fn new(target: &RequestTarget) -> Self {
        Self {
            url: target.url.clone(),
            method: target.method,
            headers: Vec::new(),
            content_type: None,
            body: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attaches a JSON body. Its length becomes the content length, zero included.
    pub fn with_json_body(mut self, body: &[u8]) -> Self {
        self.content_type = Some(CONTENT_TYPE_JSON);
        self.body = Some(body.to_vec());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header value with a case-insensitive name match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn content_length(&self) -> u64 {
        self.body.as_ref().map_or(0, |b| b.len() as u64)
    }
}
