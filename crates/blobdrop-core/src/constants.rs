//! Upload limits and allow-lists.

/// Upload ceiling: 2 MiB.
pub const MAX_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;

/// Content types accepted by the upload endpoint (compared lower-cased).
pub const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/jpg"];

/// Content types reported by the health endpoint. `image/jpg` is a non-standard
/// alias of `image/jpeg` and is accepted but not advertised.
pub const ADVERTISED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// File extensions accepted by the upload endpoint, with the leading dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif"];

/// Container used when `AZURE_STORAGE_CONTAINER_NAME` is unset.
pub const DEFAULT_CONTAINER_NAME: &str = "tprofiletest";

/// Route prefix used when `ROUTE_PREFIX` is unset.
pub const DEFAULT_ROUTE_PREFIX: &str = "/api/files";

/// Whole megabytes in the upload ceiling, as quoted in client messages.
pub const fn max_file_size_mb() -> u64 {
    MAX_FILE_SIZE_BYTES / (1024 * 1024)
}
