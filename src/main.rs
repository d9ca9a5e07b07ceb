use anyhow::{Context, Result};
use axum::Router;
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;

use config::{AppConfig, Backend};
use services::{
    memory_store::MemoryObjectStore, object_store::ObjectStore, s3_store::S3ObjectStore,
    storage_service::StorageService,
};

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // --- Parse config ---
    let cfg = AppConfig::from_env_and_args()?;

    tracing::info!("Starting bucket-manager with config: {:?}", cfg);

    // --- Initialize storage binding ---
    let store = connect_store(&cfg).await?;
    tracing::info!("Using storage binding {}", store.describe());

    // --- Initialize core service ---
    let storage = StorageService::new(store, cfg.public_url.clone())
        .with_list_all_pages(cfg.list_all_pages);

    // --- Build router ---
    let app: Router = routes::routes::routes(cfg.max_upload_bytes).with_state(storage);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err).with_context(|| format!("binding {}", addr)),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the storage binding selected by the config.
async fn connect_store(cfg: &AppConfig) -> Result<Arc<dyn ObjectStore>> {
    match cfg.backend {
        Backend::S3 => {
            let store = S3ObjectStore::connect(cfg)
                .await
                .context("configuring S3 client")?;
            Ok(Arc::new(store))
        }
        Backend::Memory => {
            tracing::warn!("Memory backend selected; uploads are lost on exit");
            Ok(Arc::new(MemoryObjectStore::new()))
        }
    }
}
