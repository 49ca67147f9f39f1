use std::path::PathBuf;

use anyhow::Context;
use dictator_server::PropertyStore;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{host}:{port}");

    let store = match std::env::var("DICTATOR_SEED") {
        Ok(path) => {
            let path = PathBuf::from(path);
            info!(path = %path.display(), "seeding property store");
            PropertyStore::from_seed_file(&path)
                .await
                .with_context(|| format!("loading seed {}", path.display()))?
        }
        Err(_) => PropertyStore::new(),
    };

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "listening");
    dictator_server::run(listener, store).await?;
    Ok(())
}
