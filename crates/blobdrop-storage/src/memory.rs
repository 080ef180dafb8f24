//! In-memory blob store for tests.

use crate::traits::{BlobStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const BASE_URL: &str = "https://blobs.example.test";

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub data: Bytes,
    pub content_type: String,
}

/// Blob store backed by a `HashMap`, with call counters and failure switches
pub struct MemoryBlobStore {
    container: String,
    blobs: Mutex<HashMap<String, StoredBlob>>,
    put_error: Mutex<Option<String>>,
    exists_error: Mutex<Option<String>>,
    exists_calls: AtomicUsize,
    put_calls: AtomicUsize,
}

impl MemoryBlobStore {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            blobs: Mutex::new(HashMap::new()),
            put_error: Mutex::new(None),
            exists_error: Mutex::new(None),
            exists_calls: AtomicUsize::new(0),
            put_calls: AtomicUsize::new(0),
        }
    }

    /// Pretend an object already exists under `name`
    pub fn seed(&self, name: &str) {
        self.blobs.lock().unwrap().insert(
            name.to_string(),
            StoredBlob {
                data: Bytes::new(),
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    /// Make every following `put` fail with `message`
    pub fn fail_puts(&self, message: &str) {
        *self.put_error.lock().unwrap() = Some(message.to_string());
    }

    /// Make every following `exists` fail with `message`
    pub fn fail_exists(&self, message: &str) {
        *self.exists_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn get(&self, name: &str) -> Option<StoredBlob> {
        self.blobs.lock().unwrap().get(name).cloned()
    }

    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    /// Total backend calls of any kind
    pub fn calls(&self) -> usize {
        self.exists_calls() + self.put_calls()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn exists(&self, name: &str) -> StorageResult<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.exists_error.lock().unwrap().clone() {
            return Err(StorageError::BackendError(message));
        }
        Ok(self.blobs.lock().unwrap().contains_key(name))
    }

    async fn put(&self, name: &str, data: Bytes, content_type: &str) -> StorageResult<String> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.put_error.lock().unwrap().clone() {
            return Err(StorageError::UploadFailed(message));
        }
        self.blobs.lock().unwrap().insert(
            name.to_string(),
            StoredBlob {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(self.url_for(name))
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}/{}", BASE_URL, self.container, name)
    }

    fn container_name(&self) -> &str {
        &self.container
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
