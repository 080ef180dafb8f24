use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use blobdrop_core::constants::{ADVERTISED_CONTENT_TYPES, MAX_FILE_SIZE_BYTES};
use blobdrop_core::models::{FailureResponse, HealthResponse, UploadResponse};
use blobdrop_core::AppError;
use chrono::Utc;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, validate_upload};

/// Message used when the adapter fails without saying why.
const UPLOAD_FAILED_MESSAGE: &str = "File upload failed.";

/// Upload image handler
///
/// Validates the multipart file (presence, size, content type, extension, in
/// that order) and hands it to the upload service, which stores it under a
/// timestamped name.
///
/// # Errors
/// - `AppError::NoFile`, `FileTooLarge`, `UnsupportedContentType`,
///   `UnsupportedExtension`, `InvalidMultipart` - 400, nothing is stored
/// - `AppError::Storage` - the blob store rejected the file (500)
#[utoipa::path(
    post,
    path = "/api/files/upload",
    tag = "files",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded successfully", body = UploadResponse),
        (status = 400, description = "Invalid file", body = FailureResponse),
        (status = 500, description = "Storage or internal failure", body = FailureResponse)
    )
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(
        operation = "upload_file",
        file_name = tracing::field::Empty,
        size_bytes = tracing::field::Empty,
        content_type = tracing::field::Empty,
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let show_detailed_errors = state.config.show_detailed_errors;
    let fail = |error: AppError| HttpAppError::new(error, show_detailed_errors);

    let multipart = multipart.map_err(|e| fail(AppError::InvalidMultipart(e.body_text())))?;
    let file = extract_multipart_file(multipart).await.map_err(fail)?;
    let file = validate_upload(file).map_err(fail)?;

    let span = tracing::Span::current();
    span.record("file_name", file.file_name.as_str());
    span.record("size_bytes", file.len());
    span.record("content_type", file.content_type.as_str());

    let result = state.uploads.upload(&file).await;
    if !result.success {
        return Err(fail(AppError::Storage {
            message: result
                .error_message
                .unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_string()),
            detail: result.error_detail,
        }));
    }

    let (Some(url), Some(file_name)) = (result.url, result.file_name) else {
        return Err(fail(AppError::Internal(
            "upload reported success without a URL or stored name".to_string(),
        )));
    };

    tracing::info!(stored_name = %file_name, url = %url, "Upload completed");

    Ok(Json(UploadResponse {
        success: true,
        url,
        file_name,
        file_size: file.len(),
        content_type: file.content_type,
        uploaded_at: Utc::now(),
    }))
}

/// Health check with the upload limits clients should respect.
#[utoipa::path(
    get,
    path = "/api/files/health",
    tag = "files",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        max_file_size: MAX_FILE_SIZE_BYTES,
        allowed_types: ADVERTISED_CONTENT_TYPES
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}
