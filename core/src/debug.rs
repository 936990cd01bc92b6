//! Capture of the last raw request/response for diagnostics.
//!
//! A `DebugTrace` holds the text of one exchange. `DebugRecorder` keeps at
//! most one trace and only while enabled: disabling drops the trace, and
//! each new recording replaces the previous one.

use std::fmt::Write as _;

use crate::http::{HttpRequest, HttpResponse};

/// Text of one request/response exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugTrace {
    pub request: Option<String>,
    /// `None` when the transport failed before a response arrived.
    pub response: Option<String>,
}

impl DebugTrace {
    pub fn capture(request: &HttpRequest, response: Option<&HttpResponse>) -> Self {
        Self {
            request: Some(render_request(request)),
            response: response.map(render_response),
        }
    }
}

/// Holds the debug flag and the most recent trace.
#[derive(Debug, Clone, Default)]
pub struct DebugRecorder {
    enabled: bool,
    trace: Option<DebugTrace>,
}

impl DebugRecorder {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            trace: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.trace = None;
        }
    }

    /// Replace the retained trace. Ignored while disabled.
    pub fn record(&mut self, trace: DebugTrace) {
        if self.enabled {
            self.trace = Some(trace);
        }
    }

    pub fn trace(&self) -> Option<&DebugTrace> {
        self.trace.as_ref()
    }
}

/// Request line and headers, ending in the blank line. The Basic credential
/// is replaced with `[REDACTED]`.
pub fn render_request(request: &HttpRequest) -> String {
    let mut out = format!("GET {} HTTP/1.1\r\n", request.url);
    for (name, value) in &request.headers {
        let value = if name.eq_ignore_ascii_case("authorization") {
            redact_authorization(value)
        } else {
            value.as_str()
        };
        let _ = write!(out, "{name}: {value}\r\n");
    }
    out.push_str("\r\n");
    out
}

/// Status line, headers, blank line, then the raw body as received.
///
/// Only the body is verbatim. The status line and header block are rebuilt
/// from `HttpResponse`: the line is always `HTTP/1.1 <status>` without a
/// reason phrase, and header names appear as the transport reported them
/// (lowercase for `UreqTransport`).
pub fn render_response(response: &HttpResponse) -> String {
    let mut out = format!("HTTP/1.1 {}\r\n", response.status);
    for (name, value) in &response.headers {
        let _ = write!(out, "{name}: {value}\r\n");
    }
    out.push_str("\r\n");
    out.push_str(&response.body);
    out
}

fn redact_authorization(value: &str) -> &str {
    match value.split_once(' ') {
        Some(("Basic", _)) => "Basic [REDACTED]",
        _ => "[REDACTED]",
    }
}
