//! Blobdrop Core Library
//!
//! This crate provides the configuration, error taxonomy and wire models
//! shared by the storage adapter and the HTTP API.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{UploadRequest, UploadResult};
pub use storage_types::StorageBackend;
