//! Error types module
//!
//! Every failure the upload API can report is an `AppError`. Variants fall in
//! three groups: client input errors (4xx, never logged above info), storage
//! backend errors and unexpected errors (both 5xx, logged in full).
//! Startup failures are not represented here; they surface as `anyhow::Error`
//! out of `main`.

use crate::constants::max_file_size_mb;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for malformed requests
    Debug,
    /// Info level - for expected validation failures
    Info,
    /// Error level - for backend and unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "FILE_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Client-facing message
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No file provided")]
    NoFile,

    #[error("File too large: {size} bytes exceeds {max_bytes} bytes")]
    FileTooLarge { size: u64, max_bytes: u64 },

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Unsupported file extension: {0:?}")]
    UnsupportedExtension(String),

    #[error("Invalid multipart body: {0}")]
    InvalidMultipart(String),

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        detail: Option<String>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Message sent for anything that is not a validation or storage failure.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred during file upload.";

impl AppError {
    /// Get error type name for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::NoFile => "NoFile",
            AppError::FileTooLarge { .. } => "FileTooLarge",
            AppError::UnsupportedContentType(_) => "UnsupportedContentType",
            AppError::UnsupportedExtension(_) => "UnsupportedExtension",
            AppError::InvalidMultipart(_) => "InvalidMultipart",
            AppError::Storage { .. } => "Storage",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Internal detail that may be echoed to clients when detailed errors are enabled.
    pub fn detailed_message(&self) -> Option<String> {
        match self {
            AppError::Storage { detail, .. } => detail.clone(),
            AppError::Internal(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::NoFile
            | AppError::FileTooLarge { .. }
            | AppError::UnsupportedContentType(_)
            | AppError::UnsupportedExtension(_)
            | AppError::InvalidMultipart(_) => 400,
            AppError::Storage { .. } | AppError::Internal(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::NoFile => "NO_FILE",
            AppError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            AppError::UnsupportedContentType(_) => "UNSUPPORTED_CONTENT_TYPE",
            AppError::UnsupportedExtension(_) => "UNSUPPORTED_EXTENSION",
            AppError::InvalidMultipart(_) => "INVALID_MULTIPART",
            AppError::Storage { .. } => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::NoFile => "No file provided.".to_string(),
            AppError::FileTooLarge { .. } => format!(
                "File size exceeds the maximum limit of {}MB.",
                max_file_size_mb()
            ),
            AppError::UnsupportedContentType(_) => {
                "Only JPG, PNG, and GIF images are allowed.".to_string()
            }
            AppError::UnsupportedExtension(_) => {
                "Invalid file extension. Only .jpg, .jpeg, .png, and .gif are allowed.".to_string()
            }
            AppError::InvalidMultipart(_) => "Invalid multipart request body.".to_string(),
            AppError::Storage { message, .. } => message.clone(),
            AppError::Internal(_) => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidMultipart(_) => LogLevel::Debug,
            AppError::Storage { .. } | AppError::Internal(_) => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}
