//! Blobdrop Storage Library
//!
//! This crate provides the `BlobStore` capability trait, its backends (Azure
//! Blob Storage, local filesystem, in-memory for tests), stored-name
//! generation, and the `UploadService` adapter that turns a validated file
//! into an `UploadResult`.
//!
//! # Stored names
//!
//! Objects are stored flat inside one container under
//! `{sanitized base}_{yyyyMMddHHmmss}{ext}`, or
//! `{sanitized base}_{yyyyMMddHHmmss}_{32 hex chars}{ext}` when the first name
//! is already taken. See the `naming` module.

#[cfg(feature = "storage-azure")]
pub mod azure;
pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(any(test, feature = "test-helpers"))]
pub mod memory;
pub mod naming;
pub mod service;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-azure")]
pub use azure::AzureBlobStore;
pub use blobdrop_core::StorageBackend;
pub use factory::create_blob_store;
#[cfg(feature = "storage-local")]
pub use local::LocalBlobStore;
#[cfg(any(test, feature = "test-helpers"))]
pub use memory::MemoryBlobStore;
pub use naming::generate_stored_name;
pub use service::{Clock, SystemClock, TokenSource, UploadService, UuidTokens};
pub use traits::{BlobStore, StorageError, StorageResult};
