//! End-to-end tests against a live dictator server.
//!
//! # Design
//! Starts the server on a random port with a seeded store, then exercises
//! every client operation over real HTTP through the default ureq transport.
//! Validates that the client's request building and envelope decoding agree
//! with the actual server.

use std::net::SocketAddr;

use dictator_core::{ClientSettings, ConfigClient, ConfigError, Lookup};
use dictator_server::{PropertyStore, Scope};

/// Spawn the server on its own runtime thread and return its address.
fn start_server(store: PropertyStore) -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            dictator_server::run(listener, store).await
        })
        .unwrap();
    });

    addr
}

/// A seeded store plus a handle the test can keep writing through.
fn seeded_store() -> PropertyStore {
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let store = PropertyStore::new();
    rt.block_on(async {
        let scope = Scope::new("billing", "prod");
        store.put(&scope, "timeout.ms", "500").await;
        store.put(&scope, "retries", "3").await;
    });
    store
}

fn client_for(addr: SocketAddr) -> ConfigClient {
    ConfigClient::new(ClientSettings::new("billing", "prod", format!("http://{addr}"))).unwrap()
}

/// An address nothing listens on.
fn dead_address() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[test]
fn get_and_reload_against_live_server() {
    let store = seeded_store();
    let addr = start_server(store.clone());
    let client = client_for(addr);

    // Step 1: single lookup.
    assert_eq!(client.get("timeout.ms").unwrap().as_deref(), Some("500"));
    assert!(client.fetch("retries").unwrap().is_found());

    // Step 2: missing key is absent, and `fetch` says why.
    assert_eq!(client.get("missing.key").unwrap(), None);
    assert!(matches!(client.fetch("missing.key").unwrap(), Lookup::NotFound));

    // Step 3: full set, then from the epoch.
    let full = client.reload(None);
    assert_eq!(full.len(), 2);
    assert_eq!(full["retries"], "3");
    assert_eq!(client.reload(Some(0)), full);

    // Step 4: far future watermark sees nothing.
    assert!(client.reload(Some(9_999_999_999_999)).is_empty());

    // Step 5: a write after the watermark shows up alone.
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let scope = Scope::new("billing", "prod");
    let watermark = rt.block_on(async {
        let records = store.changed_since(&scope, None).await.unwrap();
        let watermark = records.iter().map(|r| r.last_updated_time).max().unwrap();
        store.put(&scope, "retries", "5").await;
        watermark
    });
    let delta = client.reload(Some(watermark));
    assert_eq!(delta.len(), 1);
    assert_eq!(delta["retries"], "5");

    client.shutdown();
}

#[test]
fn reload_narrows_as_watermark_grows() {
    let store = seeded_store();
    let addr = start_server(store.clone());
    let client = client_for(addr);

    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let mut stamps: Vec<i64> = rt.block_on(async {
        store
            .changed_since(&Scope::new("billing", "prod"), None)
            .await
            .unwrap()
            .iter()
            .map(|r| r.last_updated_time)
            .collect()
    });
    stamps.sort_unstable();

    let mut previous = client.reload(None);
    for t in stamps {
        let next = client.reload(Some(t));
        assert!(next.keys().all(|k| previous.contains_key(k)));
        previous = next;
    }
    assert!(previous.is_empty());
}

#[test]
fn unknown_scope_degrades_to_absent_and_empty() {
    let addr = start_server(seeded_store());
    let client =
        ConfigClient::new(ClientSettings::new("billing", "staging", format!("http://{addr}"))).unwrap();

    assert_eq!(client.get("timeout.ms").unwrap(), None);
    assert!(client.reload(None).is_empty());
}

#[test]
fn unreachable_server_degrades_to_absent_and_empty() {
    let client = client_for(dead_address());

    assert_eq!(client.get("timeout.ms").unwrap(), None);
    assert!(client.reload(Some(0)).is_empty());
    match client.fetch("timeout.ms").unwrap() {
        Lookup::Failed(err) => assert!(err.is_transport(), "unexpected {err}"),
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[test]
fn construction_fails_fast_without_required_settings() {
    let mut settings = ClientSettings::new("billing", "prod", format!("http://{}", dead_address()));
    settings.deployment_id = None;
    let err = ConfigClient::new(settings).err();
    assert_eq!(err, Some(ConfigError::MissingSetting("deploymentId")));

    let err = ConfigClient::new(ClientSettings::default()).err();
    assert_eq!(err, Some(ConfigError::MissingSetting("appId")));
}
