#[cfg(feature = "storage-azure")]
use crate::AzureBlobStore;
#[cfg(feature = "storage-local")]
use crate::LocalBlobStore;
use crate::{BlobStore, StorageBackend, StorageError, StorageResult};
use blobdrop_core::Config;
use std::sync::Arc;

/// Create a blob store based on configuration
pub async fn create_blob_store(config: &Config) -> StorageResult<Arc<dyn BlobStore>> {
    match config.storage_backend {
        #[cfg(feature = "storage-azure")]
        StorageBackend::Azure => {
            let connection_string =
                config.azure_connection_string.as_deref().ok_or_else(|| {
                    StorageError::ConfigError(
                        "AZURE_STORAGE_CONNECTION_STRING not configured".to_string(),
                    )
                })?;

            let store = AzureBlobStore::connect(connection_string, &config.container_name).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-azure"))]
        StorageBackend::Azure => Err(StorageError::ConfigError(
            "Azure storage backend not available (storage-azure feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let store = LocalBlobStore::new(
                config.local_storage_path.clone(),
                config.container_name.clone(),
                config.local_storage_base_url.clone(),
            )
            .await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(any(test, feature = "test-helpers"))]
        StorageBackend::Memory => Ok(Arc::new(crate::MemoryBlobStore::new(
            config.container_name.clone(),
        ))),

        #[cfg(not(any(test, feature = "test-helpers")))]
        StorageBackend::Memory => Err(StorageError::ConfigError(
            "Memory storage backend is only available in tests".to_string(),
        )),
    }
}
