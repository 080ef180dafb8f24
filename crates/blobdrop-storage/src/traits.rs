//! Storage abstraction trait
//!
//! This module defines the BlobStore trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid blob name: {0}")]
    InvalidName(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Blob storage capability
///
/// A store is bound to one container at construction time. Implementations
/// are shared across concurrent requests behind an `Arc`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Check whether an object with this name exists in the container
    async fn exists(&self, name: &str) -> StorageResult<bool>;

    /// Store `data` under `name`, recording `content_type` as object metadata.
    /// Returns the object's public URL. Overwrites an existing object.
    async fn put(&self, name: &str, data: Bytes, content_type: &str) -> StorageResult<String>;

    /// Public URL an object with this name has (or would have)
    fn url_for(&self, name: &str) -> String;

    /// Name of the container this store writes to
    fn container_name(&self) -> &str;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
