//! In-memory property store backing the lookup and diff endpoints.
//!
//! Properties are grouped by scope. Every write stamps the record with
//! `max(now_ms, last_stamp + 1)`, so stamps never repeat and never go
//! backwards even when the wall clock does. That keeps the strict
//! greater-than diff from skipping or re-delivering a write.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    pub app_id: String,
    pub deployment_id: String,
}

impl Scope {
    pub fn new(app_id: impl Into<String>, deployment_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            deployment_id: deployment_id.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub property_name: String,
    pub value: String,
    pub last_updated_time: i64,
}

/// Result of resolving one property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolved {
    Found(PropertyRecord),
    Missing,
    UnknownScope,
}

/// One scope's worth of initial properties in a seed document.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedScope {
    #[serde(flatten)]
    pub scope: Scope,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
struct Inner {
    scopes: HashMap<Scope, HashMap<String, PropertyRecord>>,
    last_stamp: i64,
}

/// Cheaply clonable handle; clones share the same data.
#[derive(Clone, Debug, Default)]
pub struct PropertyStore {
    inner: Arc<RwLock<Inner>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a JSON seed file.
    pub async fn from_seed_file(path: &Path) -> Result<Self, SeedError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let scopes: Vec<SeedScope> = serde_json::from_str(&raw)?;
        let store = Self::new();
        store.seed(scopes).await;
        Ok(store)
    }

    pub async fn seed(&self, scopes: Vec<SeedScope>) {
        for entry in scopes {
            // An empty property list still makes the scope known.
            self.inner
                .write()
                .await
                .scopes
                .entry(entry.scope.clone())
                .or_default();
            for (name, value) in entry.properties {
                self.put(&entry.scope, &name, &value).await;
            }
        }
    }

    /// Insert or overwrite a property and return the stamped record.
    pub async fn put(&self, scope: &Scope, name: &str, value: &str) -> PropertyRecord {
        let mut inner = self.inner.write().await;
        let stamp = now_millis().max(inner.last_stamp + 1);
        inner.last_stamp = stamp;
        let record = PropertyRecord {
            property_name: name.to_string(),
            value: value.to_string(),
            last_updated_time: stamp,
        };
        inner
            .scopes
            .entry(scope.clone())
            .or_default()
            .insert(name.to_string(), record.clone());
        record
    }

    pub async fn find(&self, scope: &Scope, name: &str) -> Resolved {
        let inner = self.inner.read().await;
        match inner.scopes.get(scope) {
            None => Resolved::UnknownScope,
            Some(properties) => properties
                .get(name)
                .cloned()
                .map_or(Resolved::Missing, Resolved::Found),
        }
    }

    /// Records stamped strictly after `since`, or all of them for `None`.
    /// Returns `None` for an unknown scope.
    pub async fn changed_since(
        &self,
        scope: &Scope,
        since: Option<i64>,
    ) -> Option<Vec<PropertyRecord>> {
        let inner = self.inner.read().await;
        let properties = inner.scopes.get(scope)?;
        Some(
            properties
                .values()
                .filter(|record| since.map_or(true, |t| record.last_updated_time > t))
                .cloned()
                .collect(),
        )
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
