//! Blobdrop API Library
//!
//! This crate provides the HTTP handlers, error rendering, and application setup.

// Module declarations
mod api_doc;
mod handlers;
pub mod setup;
mod telemetry;
mod utils;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::HttpAppError;
pub use state::AppState;
