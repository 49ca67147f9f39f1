//! Client settings, set programmatically or read from the environment.

use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;
use crate::types::ScopeKey;

pub const ENV_APP_ID: &str = "DICTATOR_APP_ID";
pub const ENV_DEPLOYMENT_ID: &str = "DICTATOR_DEPLOYMENT_ID";
pub const ENV_SERVER_URL: &str = "DICTATOR_SERVER_URL";
pub const ENV_TIMEOUT_MS: &str = "DICTATOR_TIMEOUT_MS";

/// Inputs to `ConfigClient::new`.
///
/// Every field is optional here so settings can be assembled piecemeal;
/// `ConfigClient::new` rejects a missing or blank `app_id`, `deployment_id`
/// or `server_url`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSettings {
    pub app_id: Option<String>,
    pub deployment_id: Option<String>,
    pub server_url: Option<String>,
    /// Whole-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl ClientSettings {
    pub fn new(
        app_id: impl Into<String>,
        deployment_id: impl Into<String>,
        server_url: impl Into<String>,
    ) -> Self {
        Self {
            app_id: Some(app_id.into()),
            deployment_id: Some(deployment_id.into()),
            server_url: Some(server_url.into()),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read `DICTATOR_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let timeout = lookup(ENV_TIMEOUT_MS).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(ms) => Some(Duration::from_millis(ms)),
            Err(_) => {
                warn!(value = %raw, "ignoring unparsable {ENV_TIMEOUT_MS}");
                None
            }
        });
        Self {
            app_id: lookup(ENV_APP_ID),
            deployment_id: lookup(ENV_DEPLOYMENT_ID),
            server_url: lookup(ENV_SERVER_URL),
            timeout,
        }
    }

    /// Check mandatory fields; yields the scope and the normalized base URL.
    pub(crate) fn validate(&self) -> Result<(ScopeKey, String), ConfigError> {
        let app_id = required(&self.app_id, "appId")?;
        let deployment_id = required(&self.deployment_id, "deploymentId")?;
        let server_url = required(&self.server_url, "serverUrl")?;
        Ok((
            ScopeKey::new(app_id, deployment_id),
            server_url.trim_end_matches('/').to_string(),
        ))
    }
}

fn required<'a>(field: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    match field.as_deref() {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingSetting(name)),
    }
}
