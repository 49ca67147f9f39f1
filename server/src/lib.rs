pub mod store;

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

pub use store::{PropertyRecord, PropertyStore, Resolved, Scope, SeedError, SeedScope};

pub const CONFIG_GET_PATH: &str = "/dictator/config/get";
pub const CONFIG_BATCH_GET_PATH: &str = "/dictator/config/batch-get";

/// `{success, data}` wrapper returned by every endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn found(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }

    /// Known scope, nothing to return.
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
        }
    }

    pub fn failure() -> Self {
        Self {
            success: false,
            data: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueData {
    pub value: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyGetRequest {
    #[serde(flatten)]
    pub scope: Scope,
    pub property_name: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGetRequest {
    #[serde(flatten)]
    pub scope: Scope,
    #[serde(default)]
    pub last_updated_time: Option<i64>,
}

pub fn app() -> Router {
    app_with_store(PropertyStore::new())
}

pub fn app_with_store(store: PropertyStore) -> Router {
    Router::new()
        .route(CONFIG_GET_PATH, post(get_property))
        .route(CONFIG_BATCH_GET_PATH, post(batch_get))
        .with_state(store)
}

pub async fn run(listener: TcpListener, store: PropertyStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_store(store)).await
}

async fn get_property(
    State(store): State<PropertyStore>,
    Json(request): Json<PropertyGetRequest>,
) -> Result<Json<Envelope<ValueData>>, StatusCode> {
    if request.property_name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let envelope = match store.find(&request.scope, &request.property_name).await {
        Resolved::Found(record) => Envelope::found(ValueData {
            value: record.value,
        }),
        Resolved::Missing => Envelope::empty(),
        Resolved::UnknownScope => Envelope::failure(),
    };
    info!(request = ?request, response = ?envelope, "config get");
    Ok(Json(envelope))
}

async fn batch_get(
    State(store): State<PropertyStore>,
    Json(request): Json<BatchGetRequest>,
) -> Json<Envelope<HashMap<String, String>>> {
    let envelope = match store
        .changed_since(&request.scope, request.last_updated_time)
        .await
    {
        Some(records) => Envelope::found(
            records
                .into_iter()
                .map(|record| (record.property_name, record.value))
                .collect(),
        ),
        None => Envelope::failure(),
    };
    info!(
        request = ?request,
        changed = envelope.data.as_ref().map_or(0, HashMap::len),
        "config batch get"
    );
    Json(envelope)
}
