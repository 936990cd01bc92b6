//! Client configuration and defaults.

use std::env;
use std::time::Duration;

use crate::error::Error;
use crate::types::Credentials;

/// Where the REST service lives unless configured otherwise.
pub const DEFAULT_URL: &str = "https://api.postcode.nl/rest";

/// Maximum time allowed to set up the connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Maximum time allowed for the whole exchange.
pub const TIMEOUT: Duration = Duration::from_secs(10);

pub const USER_AGENT: &str = concat!("postcode-core/", env!("CARGO_PKG_VERSION"));

pub const ENV_KEY: &str = "POSTCODE_NL_KEY";
pub const ENV_SECRET: &str = "POSTCODE_NL_SECRET";
pub const ENV_URL: &str = "POSTCODE_NL_URL";
pub const ENV_DEBUG: &str = "POSTCODE_NL_DEBUG";

/// Everything needed to construct a `PostcodeClient`.
///
/// Credentials are checked when the client is built, not here.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub credentials: Credentials,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub user_agent: String,
    pub debug: bool,
}

impl ClientConfig {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            credentials: Credentials::new(key, secret),
            connect_timeout: CONNECT_TIMEOUT,
            timeout: TIMEOUT,
            user_agent: USER_AGENT.to_string(),
            debug: false,
        }
    }

    /// Read `POSTCODE_NL_KEY`, `POSTCODE_NL_SECRET` and the optional
    /// `POSTCODE_NL_URL` / `POSTCODE_NL_DEBUG`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| Error::client(format!("environment variable `{name}` is not set")))
        };
        let mut config = Self::new(required(ENV_KEY)?, required(ENV_SECRET)?);
        if let Some(url) = lookup(ENV_URL).filter(|url| !url.trim().is_empty()) {
            config.base_url = url;
        }
        if let Some(flag) = lookup(ENV_DEBUG) {
            config.debug = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeouts(mut self, connect_timeout: Duration, timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
