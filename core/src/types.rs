//! Request DTOs and scope identity for the config API.
//!
//! # Design
//! These types mirror the server's wire schema but are defined independently
//! of the `dictator-server` crate. Integration tests catch any schema drift
//! between the two. Field names travel as camelCase.

use serde::{Deserialize, Serialize};

/// The `(appId, deploymentId)` pair a property belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeKey {
    pub app_id: String,
    pub deployment_id: String,
}

impl ScopeKey {
    pub fn new(app_id: impl Into<String>, deployment_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            deployment_id: deployment_id.into(),
        }
    }
}

/// Body of a single-property lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRequest {
    #[serde(flatten)]
    pub scope: ScopeKey,
    pub property_name: String,
}

/// Body of an incremental batch fetch. `last_updated_time: None` is sent as
/// `null` and asks for the complete current set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    #[serde(flatten)]
    pub scope: ScopeKey,
    pub last_updated_time: Option<i64>,
}
