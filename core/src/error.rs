//! Error types for the address lookup client.
//!
//! # Design
//! Every failure a lookup can produce is one `Error` value: a fieldless
//! `ErrorKind` for exhaustive matching, a human-readable message, and the
//! upstream `exceptionId` when the service supplied one. Transport failures
//! have their own `TransportError` so `Transport` implementations do not need
//! to know about the service's error taxonomy; the client folds them into
//! `ErrorKind::Client`.

use std::fmt;

use thiserror::Error;

/// The category of a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Local misconfiguration or a transport failure (DNS, TLS, refused
    /// connection, timeout). Not retried.
    Client,

    /// The service malfunctioned or returned something unusable. Callers may
    /// retry.
    Service,

    /// The key or secret was rejected.
    Authentication,

    /// The caller's input is malformed or could not be verified.
    InputInvalid,

    /// The input is well-formed but no address matches it.
    AddressNotFound,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Client => "client error",
            ErrorKind::Service => "service error",
            ErrorKind::Authentication => "authentication error",
            ErrorKind::InputInvalid => "invalid input",
            ErrorKind::AddressNotFound => "address not found",
        };
        f.write_str(name)
    }
}

/// A classified lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    identifier: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            identifier: None,
        }
    }

    pub fn client(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Client, message)
    }

    pub fn service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Service, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    pub fn input_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InputInvalid, message)
    }

    pub fn address_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AddressNotFound, message)
    }

    /// Attach the upstream identifier used for log correlation.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The service's `exceptionId`, or the transport's error code for
    /// `ErrorKind::Client` failures raised by a `Transport`.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
}

/// Failure reported by a `Transport` before any HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("connection error `{code}`: `{message}`")]
pub struct TransportError {
    /// Short machine-readable cause, e.g. `timeout` or `connection_failed`.
    pub code: String,
    pub message: String,
}

impl TransportError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        let message = err.to_string();
        Error::client(message).with_identifier(err.code)
    }
}
