//! Application state shared by all handlers.

use blobdrop_core::Config;
use blobdrop_storage::{BlobStore, UploadService};
use std::sync::Arc;

/// Built once at startup and handed to handlers through axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub uploads: UploadService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn BlobStore>) -> Self {
        Self {
            config,
            uploads: UploadService::new(store),
        }
    }

    /// Replace the upload service, e.g. with one using a fixed clock.
    pub fn with_uploads(mut self, uploads: UploadService) -> Self {
        self.uploads = uploads;
        self
    }
}
