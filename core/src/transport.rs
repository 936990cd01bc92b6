//! Blocking `Transport` backed by a ureq agent.

use std::fmt;
use std::io;
use std::time::Duration;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// `Transport` that performs real network I/O with ureq.
///
/// The agent is configured so 4xx/5xx responses come back as data, and with
/// two independent budgets: one for connection setup and one for the whole
/// exchange.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(connect_timeout))
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.agent.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let mut response = builder.call().map_err(transport_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(transport_error)?;

        tracing::trace!(url = %request.url, status, "http round trip");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn transport_error(err: ureq::Error) -> TransportError {
    let code = match &err {
        ureq::Error::Timeout(_) => "timeout",
        ureq::Error::HostNotFound => "host_not_found",
        ureq::Error::ConnectionFailed => "connection_failed",
        ureq::Error::Io(e) => match e.kind() {
            io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => "connection_failed",
            io::ErrorKind::TimedOut => "timeout",
            _ => "io",
        },
        _ => "transport",
    };
    TransportError::new(code, err.to_string())
}
