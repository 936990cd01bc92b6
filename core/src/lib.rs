//! Blocking client for the Postcode.nl address lookup API.
//!
//! # Overview
//! A lookup normalizes the caller's postcode and house number, builds one
//! authenticated GET request, sends it through a [`Transport`], and
//! classifies the response into an [`AddressRecord`] or an [`Error`] whose
//! [`ErrorKind`] tells the caller whether retrying makes sense.
//!
//! # Design
//! - Input handling ([`input`]) and response classification ([`classify`])
//!   are pure functions and testable without a network.
//! - The I/O boundary is the [`Transport`] trait; [`UreqTransport`] is the
//!   default implementation.
//! - [`PostcodeClient::lookup`] is stateless and returns its diagnostics;
//!   [`PostcodeClient::lookup_address`] additionally remembers the last
//!   response data and debug trace.

pub mod classify;
pub mod client;
pub mod config;
pub mod debug;
pub mod error;
pub mod http;
pub mod input;
pub mod transport;
pub mod types;

pub use classify::RawResponse;
pub use client::{Exchange, Lookup, PostcodeClient};
pub use config::ClientConfig;
pub use debug::DebugTrace;
pub use error::{Error, ErrorKind, TransportError};
pub use http::{HttpRequest, HttpResponse, Transport};
pub use input::{is_valid_postcode_format, split_house_number};
pub use transport::UreqTransport;
pub use types::{AddressQuery, AddressRecord, Credentials, LookupRequest};
