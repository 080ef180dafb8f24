//! Application setup and initialization
//!
//! Kept out of `main.rs` so integration tests can build the same router.

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use blobdrop_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Telemetry first so validation warnings are not lost
    crate::telemetry::init_telemetry(config.log_format)?;

    validation::validate_config(&config).context("Configuration validation failed")?;

    tracing::info!(
        environment = %config.environment,
        backend = %config.storage_backend,
        container = %config.container_name,
        "Configuration loaded and validated successfully"
    );

    // An unreachable or unauthorized blob store is fatal
    let store = storage::setup_storage(&config)
        .await
        .context("Failed to initialize blob storage")?;

    let state = Arc::new(AppState::new(config.clone(), store));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
