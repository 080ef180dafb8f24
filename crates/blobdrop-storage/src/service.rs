//! Upload adapter: name, conflict check, store, report.

use std::sync::Arc;

use blobdrop_core::{UploadRequest, UploadResult};
use chrono::{DateTime, Utc};

use crate::naming::generate_stored_name;
use crate::traits::BlobStore;

const EXISTS_FAILED_MESSAGE: &str = "Failed to check blob storage for an existing file.";
const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload file to blob storage.";

/// Source of the timestamp embedded in stored names.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of the collision tokens added to conflicting names.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> String;
}

/// 32 lowercase hex characters from a random UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokens;

impl TokenSource for UuidTokens {
    fn token(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Persists validated files and reports the outcome as an [`UploadResult`].
///
/// Backend failures never escape as errors: they are logged and folded into
/// `UploadResult::failed`.
///
/// The existence check and the upload are two separate calls, so two
/// concurrent uploads that both land on the token-suffixed name could
/// overwrite each other. With 128 random bits per token this is accepted
/// rather than guarded against.
#[derive(Clone)]
pub struct UploadService {
    store: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
    tokens: Arc<dyn TokenSource>,
}

impl UploadService {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            tokens: Arc::new(UuidTokens),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_tokens(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = tokens;
        self
    }

    #[tracing::instrument(
        skip(self, file),
        fields(
            original_name = %file.file_name,
            size_bytes = file.len(),
            container = %self.store.container_name(),
        )
    )]
    pub async fn upload(&self, file: &UploadRequest) -> UploadResult {
        let start = std::time::Instant::now();
        let mut stored_name = generate_stored_name(&file.file_name, self.clock.now(), None);

        match self.store.exists(&stored_name).await {
            Ok(false) => {}
            Ok(true) => {
                let token = self.tokens.token();
                let conflicting = stored_name;
                stored_name =
                    generate_stored_name(&file.file_name, self.clock.now(), Some(&token));
                tracing::warn!(
                    conflicting_name = %conflicting,
                    stored_name = %stored_name,
                    "Stored name already taken, using token-suffixed name"
                );
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    stored_name = %stored_name,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Blob existence check failed"
                );
                return UploadResult::failed(EXISTS_FAILED_MESSAGE).with_detail(e.to_string());
            }
        }

        match self
            .store
            .put(&stored_name, file.data.clone(), &file.content_type)
            .await
        {
            Ok(url) => {
                tracing::info!(
                    stored_name = %stored_name,
                    url = %url,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "File stored"
                );
                UploadResult::succeeded(url, stored_name, self.store.container_name())
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    stored_name = %stored_name,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Blob upload failed"
                );
                UploadResult::failed(UPLOAD_FAILED_MESSAGE).with_detail(e.to_string())
            }
        }
    }
}
