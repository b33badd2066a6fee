//! Blocking HTTP via the curl crate (libcurl).
//!
//! One Easy handle per request; headers go in as a curl list and the body is
//! collected through the transfer's write callback. Runs on the calling
//! thread.

use std::str;
use std::time::Duration;

use super::{HttpRequest, HttpResponse, Method, Transport, TransportError};

/// Knobs for the curl transport.
#[derive(Debug, Clone, Copy)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub follow_redirects: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
            follow_redirects: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CurlTransport {
    options: TransportOptions,
}

impl CurlTransport {
    pub fn new(options: TransportOptions) -> Self {
        Self { options }
    }
}

impl Transport for CurlTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(request.url.as_str())?;
        match request.method {
            Method::Get => easy.get(true)?,
            Method::Head => easy.nobody(true)?,
            other => easy.custom_request(other.as_str())?,
        }
        if self.options.follow_redirects {
            easy.follow_location(true)?;
            easy.max_redirections(10)?;
        }
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.timeout(self.options.timeout)?;

        if !request.headers.is_empty() {
            let mut list = curl::easy::List::new();
            for (name, value) in &request.headers {
                list.append(&format!("{}: {}", name.trim(), value.trim()))?;
            }
            easy.http_headers(list)?;
        }

        let mut body = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()? as u16;
        Ok(HttpResponse { status, body })
    }
}

// Curl's error codes carry the timeout/connection distinction the outcome
// classifier needs; mapped here so nothing above this module sees curl types.
impl From<curl::Error> for TransportError {
    fn from(e: curl::Error) -> Self {
        if e.is_operation_timedout() {
            return TransportError::Timeout(e.to_string());
        }
        if e.is_couldnt_connect()
            || e.is_couldnt_resolve_host()
            || e.is_couldnt_resolve_proxy()
            || e.is_read_error()
            || e.is_recv_error()
            || e.is_send_error()
            || e.is_got_nothing()
        {
            return TransportError::Connection(e.to_string());
        }
        TransportError::Other(e.to_string())
    }
}
