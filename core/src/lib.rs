//! Blocking client core for the dictator configuration service.
//!
//! # Overview
//! Applications read named properties for one `(appId, deploymentId)` scope,
//! either one at a time (`get`) or as an incremental batch of everything
//! changed after a timestamp (`reload`). Every response is a
//! `{success, data}` envelope.
//!
//! # Design
//! - `ConfigClient` is immutable once built; it owns its transport and the
//!   transport owns the connection pool.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit and the
//!   protocol is testable without a network.
//! - `fetch`/`fetch_batch` report why a value is missing; `get`/`reload`
//!   collapse every failure into `None` or an empty map.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod envelope;
pub mod error;
pub mod http;
pub mod settings;
pub mod transport;
pub mod types;

pub use client::{ConfigClient, Lookup, CONFIG_BATCH_GET_PATH, CONFIG_GET_PATH};
pub use envelope::{decode_batch, decode_value, Envelope, ValueData};
pub use error::{ConfigError, FetchError};
pub use http::{HttpRequest, HttpResponse};
pub use settings::ClientSettings;
pub use transport::{HttpTransport, Transport};
pub use types::{BatchRequest, PropertyRequest, ScopeKey};
