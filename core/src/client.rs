//! Address lookup client.
//!
//! # Design
//! A lookup is split the same way as every other call in this crate: a
//! `build_*` step that produces an `HttpRequest`, one `Transport` round trip,
//! and a `parse_*` step that classifies the response. [`PostcodeClient::lookup`]
//! runs the whole exchange without touching instance state and hands back
//! the decoded body and debug trace in a [`Lookup`]. The stateful
//! [`PostcodeClient::lookup_address`] wraps it and keeps the last response
//! data and trace on the instance for post-mortem inspection; it takes
//! `&mut self`, so one client cannot be used for overlapping lookups.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::classify::{classify, RawResponse};
use crate::config::ClientConfig;
use crate::debug::{DebugRecorder, DebugTrace};
use crate::error::Error;
use crate::http::{HttpRequest, Transport};
use crate::input::normalize;
use crate::transport::UreqTransport;
use crate::types::{AddressQuery, AddressRecord, Credentials, LookupRequest};

/// Client for the address lookup service.
#[derive(Debug)]
pub struct PostcodeClient<T = UreqTransport> {
    base_url: String,
    credentials: Credentials,
    user_agent: String,
    transport: T,
    debug: DebugRecorder,
    last_response_data: Option<Value>,
}

/// Outcome of one lookup, including what was seen on the wire.
#[derive(Debug, Clone)]
pub struct Lookup {
    pub result: Result<AddressRecord, Error>,
    /// `None` when the input was rejected before any request was sent.
    pub exchange: Option<Exchange>,
}

/// Diagnostics of a request that was actually sent.
#[derive(Debug, Clone, Default)]
pub struct Exchange {
    /// Decoded response body; `None` if it was not JSON or no response
    /// arrived.
    pub response_data: Option<Value>,
    /// Present only when debug capture is enabled.
    pub trace: Option<DebugTrace>,
}

impl PostcodeClient<UreqTransport> {
    /// Client for the default service URL using a blocking ureq transport.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self, Error> {
        Self::from_config(ClientConfig::new(key, secret))
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, Error> {
        let transport = UreqTransport::new(config.connect_timeout, config.timeout);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> PostcodeClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, Error> {
        if !config.credentials.is_complete() {
            return Err(Error::client(
                "no application key / secret configured, you can obtain these at https://services.postcode.nl",
            ));
        }
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: config.credentials,
            user_agent: config.user_agent,
            transport,
            debug: DebugRecorder::new(config.debug),
            last_response_data: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_lookup(&self, query: &AddressQuery) -> HttpRequest {
        let url = format!(
            "{}/addresses/postcode/{}/{}/{}",
            self.base_url,
            urlencoding::encode(&query.postcode),
            urlencoding::encode(&query.house_number),
            urlencoding::encode(&query.house_number_addition),
        );
        let token = STANDARD.encode(format!(
            "{}:{}",
            self.credentials.key(),
            self.credentials.secret()
        ));
        HttpRequest {
            url,
            headers: vec![
                ("Authorization".to_string(), format!("Basic {token}")),
                ("User-Agent".to_string(), self.user_agent.clone()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
        }
    }

    /// Classify `response` and decode the address, enforcing the addition
    /// check when `strict` is set.
    pub fn parse_lookup(
        &self,
        response: &RawResponse,
        query: &AddressQuery,
        strict: bool,
    ) -> Result<AddressRecord, Error> {
        let object = classify(response)?;
        let record: AddressRecord = serde_json::from_value(Value::Object(object.clone()))
            .map_err(|e| Error::service(format!("response data is not a valid address record: {e}")))?;

        if strict && record.house_number_addition.is_none() {
            return Err(Error::input_invalid(format!(
                "house number addition `{}` is not known for this address, valid additions are: `{}`",
                query.house_number_addition,
                record.house_number_additions.join("`, `"),
            )));
        }
        Ok(record)
    }

    /// Run one lookup without touching instance state.
    pub fn lookup(&self, request: &LookupRequest) -> Lookup {
        let query = match normalize(request) {
            Ok(query) => query,
            Err(err) => {
                return Lookup {
                    result: Err(err),
                    exchange: None,
                }
            }
        };
        tracing::debug!(
            postcode = %query.postcode,
            house_number = %query.house_number,
            addition = %query.house_number_addition,
            "looking up address"
        );

        let http_request = self.build_lookup(&query);
        let capture = self.debug.is_enabled();

        let http_response = match self.transport.execute(&http_request) {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(code = %err.code, "transport failed");
                return Lookup {
                    result: Err(err.into()),
                    exchange: Some(Exchange {
                        response_data: None,
                        trace: capture.then(|| DebugTrace::capture(&http_request, None)),
                    }),
                };
            }
        };

        let trace = capture.then(|| DebugTrace::capture(&http_request, Some(&http_response)));
        let raw = RawResponse::from_http(&http_response);
        let result = self.parse_lookup(&raw, &query, request.strict_addition_validation);
        if let Err(err) = &result {
            tracing::debug!(kind = %err.kind(), identifier = ?err.identifier(), "lookup failed");
        }

        Lookup {
            result,
            exchange: Some(Exchange {
                response_data: raw.data,
                trace,
            }),
        }
    }

    /// Look up an address, remembering the response data and debug trace of
    /// this call.
    pub fn lookup_address(&mut self, request: &LookupRequest) -> Result<AddressRecord, Error> {
        let Lookup { result, exchange } = self.lookup(request);
        if let Some(exchange) = exchange {
            self.last_response_data = exchange.response_data;
            if let Some(trace) = exchange.trace {
                self.debug.record(trace);
            }
        }
        result
    }

    /// Toggle debug capture; disabling discards any retained trace.
    pub fn set_debug_enabled(&mut self, enabled: bool) {
        self.debug.set_enabled(enabled);
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.is_enabled()
    }

    pub fn debug_data(&self) -> Option<&DebugTrace> {
        self.debug.trace()
    }

    /// Decoded JSON of the most recent response, useful for inspecting the
    /// service's own explanation after an error.
    pub fn last_response_data(&self) -> Option<&Value> {
        self.last_response_data.as_ref()
    }
}
