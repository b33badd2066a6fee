//! Outbound HTTP seam.
//!
//! The executor talks to a `Transport` trait so the retry loop can be tested
//! against a scripted in-memory transport; `CurlTransport` is the real one.

mod curl_client;

pub use curl_client::{CurlTransport, TransportOptions};

use std::collections::HashMap;
use std::fmt;

use url::Url;

/// HTTP method for the request template. GET is the default; the demo
/// scenarios only need GET but the wrapper does not care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// One concrete request, fully addressed. Built fresh per attempt from the
/// template and the attempt's resolved target.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HashMap<String, String>,
}

/// Raw response: status and body. Classification happens elsewhere; a non-2xx
/// status is not a transport error.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Failure before any HTTP status was read.
#[derive(Debug, Clone)]
pub enum TransportError {
    /// Connect or overall deadline exceeded.
    Timeout(String),
    /// Could not connect or resolve, or the connection dropped mid-transfer.
    Connection(String),
    /// Anything else the client library reported.
    Other(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Timeout(msg) => write!(f, "timeout: {}", msg),
            TransportError::Connection(msg) => write!(f, "connection: {}", msg),
            TransportError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// Issues a single request. Implementations must not retry internally; the
/// executor owns every retry decision.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
