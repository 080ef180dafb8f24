//! Upload request/result types and the JSON bodies returned by the API.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A file received by the upload endpoint. Lives for one request.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// File name as sent by the client, possibly including directories.
    pub file_name: String,
    /// Declared content type, as sent.
    pub content_type: String,
    pub data: Bytes,
}

impl UploadRequest {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Outcome of a storage adapter call.
///
/// Backend failures are reported here rather than as errors, so `success` is
/// the only thing a caller has to branch on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadResult {
    pub success: bool,
    pub url: Option<String>,
    /// Stored name, which differs from the original file name.
    pub file_name: Option<String>,
    /// Client-safe description of the failed step.
    pub error_message: Option<String>,
    /// Backend error text; only echoed to clients when detailed errors are on.
    pub error_detail: Option<String>,
    pub container_name: Option<String>,
}

impl UploadResult {
    pub fn succeeded(
        url: impl Into<String>,
        file_name: impl Into<String>,
        container_name: impl Into<String>,
    ) -> Self {
        Self {
            success: true,
            url: Some(url.into()),
            file_name: Some(file_name.into()),
            error_message: None,
            error_detail: None,
            container_name: Some(container_name.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.error_detail = Some(detail.into());
        self
    }
}

/// Body of a successful upload (HTTP 200).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Always `true`.
    pub success: bool,
    /// Public URL of the stored object.
    pub url: String,
    /// Stored name of the object.
    pub file_name: String,
    /// Size of the uploaded file in bytes.
    pub file_size: u64,
    /// Content type as declared by the client.
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Body of every failed request (HTTP 4xx/5xx).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailureResponse {
    /// Always `false`.
    pub success: bool,
    pub message: String,
    /// Internal error text, only present when detailed errors are enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_error: Option<String>,
}

impl FailureResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            detailed_error: None,
        }
    }

    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detailed_error = detail;
        self
    }
}

/// Body of the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Upload ceiling in bytes.
    pub max_file_size: u64,
    pub allowed_types: Vec<String>,
}
