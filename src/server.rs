//! HTTP server initialization and runtime setup.
//!
//! Handles storage backend selection, service loading, and Axum server lifecycle.

use crate::application::services::{AdService, CatalogOptions, CatalogService, StatsService};
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::CollectionStore;
use crate::infrastructure::persistence::{JsonFileStore, MemoryStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Builds the storage backend selected by the configuration.
pub fn build_store(config: &Config) -> Arc<dyn CollectionStore> {
    match config.storage_backend {
        StorageBackend::File => {
            tracing::info!("Storage: JSON files in {}", config.data_dir.display());
            Arc::new(JsonFileStore::new(&config.data_dir))
        }
        StorageBackend::Memory => {
            tracing::warn!("Storage: in-memory, data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    }
}

/// Loads both collections and wires the services into handler state.
pub async fn build_state(config: &Config, store: Arc<dyn CollectionStore>) -> AppState {
    let ads = Arc::new(AdService::load(store.clone()).await);
    let stats = Arc::new(StatsService::load(store.clone()).await);

    let catalog = CatalogService::new(
        ads,
        stats,
        CatalogOptions {
            id_policy: config.id_policy,
            cascade_delete_stats: config.cascade_delete_stats,
        },
    );

    AppState {
        catalog: Arc::new(catalog),
        store,
        admin_key: Arc::from(config.admin_key.as_str()),
        viewer_key_source: config.viewer_key_source,
        behind_proxy: config.behind_proxy,
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage backend (JSON files or memory)
/// - Ad and statistics collections
/// - Axum HTTP server with connect info for per-client keys
///
/// Stops on Ctrl+C after in-flight requests complete.
///
/// # Errors
///
/// Returns an error if:
/// - The storage backend is not usable at startup
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = build_store(&config);

    if !store.health_check().await {
        anyhow::bail!("Storage backend is not writable");
    }

    let state = build_state(&config, store).await;

    let app = app_router(state, &config.static_dir);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
