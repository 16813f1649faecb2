use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use blog_server::config::AppConfig;
use blog_server::seed;
use blog_server::state::AppState;
use common::storage::MemoryStore;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let store = match &config.store.snapshot_path {
        Some(path) if path.exists() => {
            let store = MemoryStore::load_snapshot(path)
                .await
                .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
            info!(path = %path.display(), items = store.len().await, "Snapshot loaded");
            store
        }
        _ => MemoryStore::new(),
    };
    let store = Arc::new(store);

    if let Some(path) = &config.store.seed_path {
        seed::seed_from_file(store.as_ref(), path)
            .await
            .with_context(|| format!("Failed to seed from {}", path.display()))?;
    }

    let shutdown = CancellationToken::new();
    let state = AppState::new(store.clone(), config.clone(), shutdown.clone());
    let app = blog_server::build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    if let Some(path) = &config.store.snapshot_path {
        let count = store
            .save_snapshot(path)
            .await
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        info!(path = %path.display(), items = count, "Snapshot written");
    }

    Ok(())
}

async fn shutdown_signal(token: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        return std::future::pending().await;
    }
    info!("Shutting down");
    token.cancel();
}
