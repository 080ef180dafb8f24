//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p blobdrop-api`.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use blobdrop_api::setup::routes;
use blobdrop_api::state::AppState;
use blobdrop_core::{Config, StorageBackend};
use blobdrop_storage::{Clock, MemoryBlobStore, UploadService};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

/// Test application: server plus the in-memory store behind it.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryBlobStore>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 2024-06-01 12:00:00 UTC
pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn create_test_config() -> Config {
    Config {
        storage_backend: StorageBackend::Memory,
        ..Config::default()
    }
}

/// Setup test app with default config and an empty in-memory store.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with(create_test_config())
}

/// Setup test app with a custom config. Stored names use [`fixed_instant`].
pub fn setup_test_app_with(config: Config) -> TestApp {
    let store = Arc::new(MemoryBlobStore::new(config.container_name.clone()));
    let uploads =
        UploadService::new(store.clone()).with_clock(Arc::new(FixedClock(fixed_instant())));
    let state = Arc::new(AppState::new(config.clone(), store.clone()).with_uploads(uploads));

    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp { server, store }
}

/// Multipart form with a single `file` part.
pub fn file_form(file_name: &str, content_type: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data)
            .file_name(file_name)
            .mime_type(content_type),
    )
}
