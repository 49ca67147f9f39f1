//! The `{success, data}` wrapper carried by every config response.
//!
//! # Design
//! Each operation decodes the body in one pass straight into its own envelope
//! shape: [`decode_value`] for lookups, [`decode_batch`] for batches. A body
//! that is not JSON, an envelope with `success=false`, and an envelope
//! without data all fail with a [`FetchError`]; callers that only want a
//! value treat every one of them the same way.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::FetchError;

/// Response wrapper. A missing or `null` `success` decodes as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Envelope<T> {
    #[serde(default, deserialize_with = "null_as_false")]
    pub success: bool,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, rejecting unsuccessful or empty envelopes.
    pub fn into_data(self) -> Result<T, FetchError> {
        if !self.success {
            return Err(FetchError::Rejected);
        }
        self.data.ok_or(FetchError::MissingData)
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// `data` shape of a single-property lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValueData {
    pub value: Option<String>,
}

/// Decode a lookup response. A `{"value": null}` payload counts as missing data.
pub fn decode_value(body: &str) -> Result<String, FetchError> {
    parse::<ValueData>(body)?
        .into_data()?
        .value
        .ok_or(FetchError::MissingData)
}

/// Decode a batch response into its `propertyName -> value` mapping.
pub fn decode_batch(body: &str) -> Result<HashMap<String, String>, FetchError> {
    parse::<HashMap<String, String>>(body)?.into_data()
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<Envelope<T>, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}
