//! Domain types for the address lookup API.
//!
//! # Design
//! `LookupRequest` is what the caller hands in, `AddressQuery` is the
//! normalized form that actually goes on the wire, and `AddressRecord` is the
//! service's success payload. `AddressRecord` keeps every field it does not
//! know about in `extra`, so newer service fields pass through untouched.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Application key and secret used for HTTP Basic authentication.
///
/// The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub(crate) fn is_complete(&self) -> bool {
        !self.key.trim().is_empty() && !self.secret.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Caller input for a single lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupRequest {
    pub postcode: String,
    /// House number, possibly with the addition typed into the same field
    /// (`"36B"`, `"123 rood"`).
    pub house_number: String,
    pub house_number_addition: String,
    /// Reject the lookup when the service does not know the addition.
    pub strict_addition_validation: bool,
}

impl LookupRequest {
    pub fn new(postcode: impl Into<String>, house_number: impl Into<String>) -> Self {
        Self {
            postcode: postcode.into(),
            house_number: house_number.into(),
            ..Self::default()
        }
    }

    pub fn with_addition(mut self, addition: impl Into<String>) -> Self {
        self.house_number_addition = addition.into();
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_addition_validation = strict;
        self
    }
}

/// Normalized, validated query: `1234AB` style postcode, digits-only house
/// number and a possibly empty addition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressQuery {
    pub postcode: String,
    pub house_number: String,
    pub house_number_addition: String,
}

/// Address returned by a successful lookup.
///
/// Missing fields and explicit `null`s both decode to the field's default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub street: String,
    #[serde(deserialize_with = "null_as_default")]
    pub house_number: u32,
    /// `None` when the requested addition is not known for this address.
    pub house_number_addition: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub postcode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub municipality: String,
    #[serde(deserialize_with = "null_as_default")]
    pub province: String,
    pub rd_x: Option<f64>,
    pub rd_y: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub bag_number_designation_id: Option<String>,
    pub bag_addressable_object_id: Option<String>,
    pub address_type: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub purposes: Vec<String>,
    pub surface_area: Option<u64>,
    /// Every addition known for this house number.
    #[serde(deserialize_with = "null_as_default")]
    pub house_number_additions: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
