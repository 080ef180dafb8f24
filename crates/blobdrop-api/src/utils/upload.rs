//! Multipart extraction and upload validation

use axum::extract::Multipart;
use blobdrop_core::constants::{ALLOWED_CONTENT_TYPES, ALLOWED_EXTENSIONS, MAX_FILE_SIZE_BYTES};
use blobdrop_core::{AppError, UploadRequest};
use blobdrop_storage::naming::{file_name_only, split_extension};

const FILE_FIELD: &str = "file";

/// Extract the uploaded file from a multipart form.
///
/// The field named `file` wins; without one, the first part that carries a
/// file name is used. A second `file` field is rejected. Returns `None` when
/// the form holds no file at all.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
) -> Result<Option<UploadRequest>, AppError> {
    let mut named: Option<UploadRequest> = None;
    let mut fallback: Option<UploadRequest> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidMultipart(format!("Failed to read multipart: {}", e)))?
    {
        let is_file_field = field.name() == Some(FILE_FIELD);

        if is_file_field && named.is_some() {
            return Err(AppError::InvalidMultipart(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }
        if !is_file_field && (fallback.is_some() || field.file_name().is_none()) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidMultipart(format!("Failed to read file data: {}", e)))?;

        let file = UploadRequest::new(file_name, content_type, data);
        if is_file_field {
            named = Some(file);
        } else {
            fallback = Some(file);
        }
    }

    Ok(named.or(fallback))
}

/// Run the validation chain, stopping at the first failure.
pub fn validate_upload(file: Option<UploadRequest>) -> Result<UploadRequest, AppError> {
    let file = file.filter(|f| !f.is_empty()).ok_or(AppError::NoFile)?;
    validate_file_size(file.len(), MAX_FILE_SIZE_BYTES)?;
    validate_content_type(&file.content_type)?;
    validate_file_extension(&file.file_name)?;
    Ok(file)
}

/// Validate file size
pub fn validate_file_size(file_size: u64, max_size: u64) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::FileTooLarge {
            size: file_size,
            max_bytes: max_size,
        });
    }
    Ok(())
}

/// Validate content type against the allow-list. Only case is ignored.
pub fn validate_content_type(content_type: &str) -> Result<(), AppError> {
    let lowered = content_type.to_lowercase();
    if !ALLOWED_CONTENT_TYPES.contains(&lowered.as_str()) {
        return Err(AppError::UnsupportedContentType(content_type.to_string()));
    }
    Ok(())
}

/// Validate the extension of the client's file name; a name without one fails.
pub fn validate_file_extension(file_name: &str) -> Result<String, AppError> {
    let (_, extension) = split_extension(file_name_only(file_name));
    let extension = extension.to_lowercase();

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::UnsupportedExtension(extension));
    }

    Ok(extension)
}
