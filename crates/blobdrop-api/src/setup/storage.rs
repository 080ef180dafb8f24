//! Storage setup and initialization

use anyhow::Result;
use blobdrop_core::Config;
use blobdrop_storage::{create_blob_store, BlobStore};
use std::sync::Arc;

/// Connect to the configured blob store. The container is created if missing.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn BlobStore>> {
    tracing::info!(backend = %config.storage_backend, "Initializing blob storage...");
    let store = create_blob_store(config).await?;
    tracing::info!(
        backend = ?store.backend_type(),
        container = %store.container_name(),
        "Blob storage initialized successfully"
    );
    Ok(store)
}
