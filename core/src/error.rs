//! Error types for the config client.
//!
//! # Design
//! `ConfigError` is fatal and reaches the caller directly: it means the
//! client was built or called with missing arguments. `FetchError` describes
//! why one exchange produced no usable value. The collapsing `get`/`reload`
//! wrappers log it and discard it; `fetch`/`fetch_batch` hand it back.

use thiserror::Error;

/// Construction or argument validation failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A mandatory client setting was absent or blank.
    #[error("{0} can not be null")]
    MissingSetting(&'static str),

    /// `get` was called with an empty property name.
    #[error("property name must not be empty")]
    EmptyPropertyName,
}

/// Why a single request produced no usable value.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection or I/O failure before a response was read.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a status other than 200.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a valid envelope of the expected shape.
    #[error("undecodable response: {0}")]
    Decode(String),

    /// The envelope carried `success=false`.
    #[error("server reported failure")]
    Rejected,

    /// The envelope was successful but carried no data.
    #[error("response carried no data")]
    MissingData,

    /// The request body could not be serialized.
    #[error("request serialization failed: {0}")]
    Encode(String),
}

impl FetchError {
    /// True when the failure happened below the HTTP layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }
}
