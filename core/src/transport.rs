//! Blocking transport that executes one `HttpRequest`.
//!
//! `HttpTransport` wraps a `ureq::Agent`. The agent owns the connection pool,
//! so every exchange made through one transport reuses its keep-alive
//! connections, and dropping the transport closes them. Status codes are
//! returned as data (`http_status_as_error(false)`); only failures below HTTP
//! become errors.

use std::time::Duration;

use crate::error::FetchError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes a single request/response exchange.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError>;
}

/// `ureq` backed transport with an owned connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        let mut builder = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let mut response = builder
            .send(request.body.as_bytes())
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
