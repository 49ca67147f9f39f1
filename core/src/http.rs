//! HTTP exchange types for the host-does-IO pattern.
//!
//! # Design
//! `HttpRequest` and `HttpResponse` describe one exchange as plain data.
//! `ConfigClient` builds requests and parses responses without touching the
//! network; a [`crate::transport::Transport`] performs the actual I/O. Every
//! config request is a POST with a JSON body, so the method is implied.

/// Content type sent with every config request.
pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// A POST request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    pub fn json(url: String, body: String) -> Self {
        Self {
            url,
            headers: vec![("content-type".to_string(), JSON_UTF8.to_string())],
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Produced by a transport after executing an `HttpRequest`, then passed to
/// `ConfigClient::parse_*` for decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}
