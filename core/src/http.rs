//! HTTP transport types and the `Transport` seam.
//!
//! # Design
//! Requests and responses are plain data. `PostcodeClient` builds an
//! `HttpRequest`, hands it to a `Transport`, and classifies the
//! `HttpResponse` it gets back. The bundled `UreqTransport` does blocking
//! I/O; tests and embedders can substitute their own implementation without
//! touching the classification logic.

use crate::error::TransportError;

/// A bodiless GET request described as plain data.
///
/// The lookup API has a single request shape, so there is no method or body
/// to carry.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
///
/// `body` is the raw text as received, before any JSON decoding.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Performs exactly one blocking HTTP round trip.
///
/// Non-2xx statuses are responses, not errors: implementations return them
/// as `Ok(HttpResponse)` and leave interpretation to the classifier. `Err`
/// is reserved for failures where no response arrived (DNS, TLS, refused
/// connection, timeout).
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
