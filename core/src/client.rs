//! Config client: request building, envelope decoding and the caller API.
//!
//! # Design
//! `ConfigClient` holds the scope, the base URL and a transport, all fixed at
//! construction. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`, so the exchange can be driven by any [`Transport`].
//!
//! Two layers sit on top. `fetch`/`fetch_batch` keep the failure detail.
//! `get`/`reload` collapse not-found, HTTP and network failures into `None`
//! or an empty map after logging them, so a polling caller has a single
//! negative case to handle. Nothing is retried.

use std::collections::HashMap;

use tracing::{debug, error, warn};

use crate::envelope;
use crate::error::{ConfigError, FetchError};
use crate::http::{HttpRequest, HttpResponse};
use crate::settings::ClientSettings;
use crate::transport::{HttpTransport, Transport};
use crate::types::{BatchRequest, PropertyRequest, ScopeKey};

/// Path of the single-property lookup endpoint, relative to the server URL.
pub const CONFIG_GET_PATH: &str = "dictator/config/get";
/// Path of the incremental batch endpoint, relative to the server URL.
pub const CONFIG_BATCH_GET_PATH: &str = "dictator/config/batch-get";

/// Outcome of a single-property lookup.
#[derive(Debug)]
pub enum Lookup {
    /// The server resolved the property.
    Found(String),
    /// The server answered but had no value (`success=false` or no data).
    NotFound,
    /// The exchange failed or the response could not be understood.
    Failed(FetchError),
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Collapse to the value, discarding why it is missing.
    pub fn into_value(self) -> Option<String> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound | Lookup::Failed(_) => None,
        }
    }
}

/// Blocking client bound to one scope and one server.
///
/// The transport, and with it the connection pool, lives exactly as long as
/// the client. Call [`ConfigClient::shutdown`] or drop the client to release
/// it.
#[derive(Debug)]
pub struct ConfigClient<T: Transport = HttpTransport> {
    scope: ScopeKey,
    base_url: String,
    transport: T,
}

impl ConfigClient<HttpTransport> {
    /// Validate `settings` and open an HTTP transport.
    pub fn new(settings: ClientSettings) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(settings.timeout);
        Self::with_transport(&settings, transport)
    }
}

impl<T: Transport> ConfigClient<T> {
    /// Validate `settings` and bind the client to a caller-supplied transport.
    pub fn with_transport(settings: &ClientSettings, transport: T) -> Result<Self, ConfigError> {
        let (scope, base_url) = settings.validate()?;
        Ok(Self {
            scope,
            base_url,
            transport,
        })
    }

    pub fn scope(&self) -> &ScopeKey {
        &self.scope
    }

    pub fn build_get(&self, property_name: &str) -> Result<HttpRequest, FetchError> {
        let body = PropertyRequest {
            scope: self.scope.clone(),
            property_name: property_name.to_string(),
        };
        self.build(CONFIG_GET_PATH, &body)
    }

    pub fn build_batch(&self, last_updated_time: Option<i64>) -> Result<HttpRequest, FetchError> {
        let body = BatchRequest {
            scope: self.scope.clone(),
            last_updated_time,
        };
        self.build(CONFIG_BATCH_GET_PATH, &body)
    }

    fn build<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<HttpRequest, FetchError> {
        let body = serde_json::to_string(body).map_err(|e| FetchError::Encode(e.to_string()))?;
        Ok(HttpRequest::json(format!("{}/{}", self.base_url, path), body))
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<String, FetchError> {
        let body = check_status(response)?;
        envelope::decode_value(&body)
    }

    pub fn parse_batch(
        &self,
        response: HttpResponse,
    ) -> Result<HashMap<String, String>, FetchError> {
        let body = check_status(response)?;
        envelope::decode_batch(&body)
    }

    /// Resolve one property, keeping the reason when there is no value.
    pub fn fetch(&self, property_name: &str) -> Result<Lookup, ConfigError> {
        if property_name.is_empty() {
            return Err(ConfigError::EmptyPropertyName);
        }
        let result = self
            .build_get(property_name)
            .and_then(|request| self.transport.execute(&request))
            .and_then(|response| self.parse_get(response));

        Ok(match result {
            Ok(value) => Lookup::Found(value),
            Err(FetchError::Rejected | FetchError::MissingData) => {
                warn!(property = property_name, "config '{property_name}' not found");
                Lookup::NotFound
            }
            Err(err) => {
                log_failure("get", &err);
                Lookup::Failed(err)
            }
        })
    }

    /// Resolve one property; every failure other than an empty name is `None`.
    pub fn get(&self, property_name: &str) -> Result<Option<String>, ConfigError> {
        self.fetch(property_name).map(Lookup::into_value)
    }

    /// Fetch every property changed strictly after `last_updated_time`, or the
    /// full set when it is `None`.
    pub fn fetch_batch(
        &self,
        last_updated_time: Option<i64>,
    ) -> Result<HashMap<String, String>, FetchError> {
        let request = self.build_batch(last_updated_time)?;
        let response = self.transport.execute(&request)?;
        self.parse_batch(response)
    }

    /// Like [`ConfigClient::fetch_batch`] but any failure yields an empty map.
    pub fn reload(&self, last_updated_time: Option<i64>) -> HashMap<String, String> {
        self.fetch_batch(last_updated_time).unwrap_or_else(|err| {
            log_failure("reload", &err);
            HashMap::new()
        })
    }

    /// Release the transport and its pooled connections.
    pub fn shutdown(self) {
        debug!(
            app_id = %self.scope.app_id,
            deployment_id = %self.scope.deployment_id,
            "config client shut down"
        );
    }
}

/// Only 200 carries a usable envelope.
fn check_status(response: HttpResponse) -> Result<String, FetchError> {
    debug!(status = response.status, body = %response.body, "dictator server response");
    if response.status == 200 {
        return Ok(response.body);
    }
    Err(FetchError::Status {
        status: response.status,
        body: response.body,
    })
}

fn log_failure(operation: &str, err: &FetchError) {
    if err.is_transport() {
        error!(operation, error = %err, "properties load fail");
    } else {
        warn!(operation, error = %err, "properties load fail");
    }
}
