//! Physical HTTP exchange.
//!
//! Uses the curl crate (libcurl) with one Easy handle per request. Redirects
//! are never followed here; the executor owns that logic.

use std::io::{self, Read};
use std::str;
use std::time::Duration;

use super::parse::parse_head;
use super::request::{Method, OutboundRequest};
use super::response::InboundResponse;
use crate::retry::{Failure, NetworkStatus, SocketCode};

/// Sends one physical request and returns whatever the server answered,
/// error statuses and redirects included.
pub trait Transport {
    fn send(&self, request: &OutboundRequest) -> Result<InboundResponse, Failure>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &OutboundRequest) -> Result<InboundResponse, Failure> {
        (**self).send(request)
    }
}

/// Timeouts applied to every request.
#[derive(Debug, Clone, Copy)]
pub struct CurlTransport {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(60),
        }
    }
}

impl Transport for CurlTransport {
    /// Runs in the current thread and blocks until the whole body is read.
    fn send(&self, request: &OutboundRequest) -> Result<InboundResponse, Failure> {
        let mut easy = curl::easy::Easy::new();
        easy.url(request.url()).map_err(setup_failure)?;
        easy.follow_location(false).map_err(setup_failure)?;
        easy.connect_timeout(self.connect_timeout).map_err(setup_failure)?;
        easy.timeout(self.timeout).map_err(setup_failure)?;

        let len = request.content_length();
        match request.method() {
            Method::Get => easy.get(true).map_err(setup_failure)?,
            Method::Post => {
                easy.post(true).map_err(setup_failure)?;
                easy.post_field_size(len).map_err(setup_failure)?;
            }
            Method::Put | Method::Delete => {
                easy.custom_request(request.method().as_str())
                    .map_err(setup_failure)?;
                easy.post(true).map_err(setup_failure)?;
                easy.post_field_size(len).map_err(setup_failure)?;
            }
        }

        let mut list = curl::easy::List::new();
        for (k, v) in request.headers() {
            list.append(&format!("{}: {}", k.trim(), v.trim()))
                .map_err(setup_failure)?;
        }
        if let Some(ct) = request.content_type() {
            list.append(&format!("Content-Type: {}", ct))
                .map_err(setup_failure)?;
        }
        // Send the body immediately instead of waiting on 100-continue.
        list.append("Expect:").map_err(setup_failure)?;
        easy.http_headers(list).map_err(setup_failure)?;

        let mut upload: &[u8] = request.body().unwrap_or(&[]);
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();
        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .read_function(|buf| Ok(upload.read(buf).unwrap_or(0)))
                .map_err(setup_failure)?;
            transfer
                .header_function(|data| {
                    if let Ok(s) = str::from_utf8(data) {
                        header_lines.push(s.trim_end().to_string());
                    }
                    true
                })
                .map_err(setup_failure)?;
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(setup_failure)?;
            transfer.perform()
        };

        if let Err(e) = performed {
            let errno = easy.os_errno().unwrap_or(0);
            return Err(map_curl_error(&e, errno));
        }

        let code = easy.response_code().map_err(setup_failure)?;
        let head = parse_head(&header_lines);
        let status = head.status.unwrap_or(code as u16);
        Ok(InboundResponse::new(status, head.status_text, head.headers, body))
    }
}

fn setup_failure(e: curl::Error) -> Failure {
    Failure::other(format!("curl: {}", e))
}

/// Map a libcurl transfer error (plus the OS errno libcurl saw, if any) into a `Failure`.
pub(crate) fn map_curl_error(e: &curl::Error, errno: i32) -> Failure {
    let status = if e.is_operation_timedout() {
        NetworkStatus::Timeout
    } else if e.is_couldnt_connect() {
        NetworkStatus::ConnectFailure
    } else if e.is_couldnt_resolve_host() || e.is_couldnt_resolve_proxy() {
        NetworkStatus::NameResolutionFailure
    } else if e.is_send_error() {
        NetworkStatus::SendFailure
    } else if e.is_recv_error() || e.is_read_error() || e.is_partial_file() {
        NetworkStatus::ReceiveFailure
    } else if e.is_got_nothing() {
        NetworkStatus::ConnectionClosed
    } else if e.is_aborted_by_callback() {
        NetworkStatus::RequestCanceled
    } else if e.is_ssl_connect_error() || e.is_peer_failed_verification() {
        NetworkStatus::SecureChannelFailure
    } else {
        NetworkStatus::Unknown
    };
    let failure = Failure::network(status, e.to_string());
    match socket_code(errno) {
        Some(code) => failure.with_inner(Failure::socket(
            code,
            io::Error::from_raw_os_error(errno).to_string(),
        )),
        None => failure,
    }
}

fn socket_code(errno: i32) -> Option<SocketCode> {
    if errno == 0 {
        return None;
    }
    Some(match io::Error::from_raw_os_error(errno).kind() {
        io::ErrorKind::ConnectionRefused => SocketCode::ConnectionRefused,
        io::ErrorKind::TimedOut => SocketCode::TimedOut,
        io::ErrorKind::ConnectionReset => SocketCode::ConnectionReset,
        _ => SocketCode::Other(errno),
    })
}
