//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. `HttpAppError`
//! wraps an `AppError` together with the `SHOW_DETAILED_ERRORS` flag, so every
//! failure renders the same `FailureResponse` body and is logged at the level
//! the error asks for.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use blobdrop_core::models::FailureResponse;
use blobdrop_core::{AppError, ErrorMetadata, LogLevel};

/// Wrapper type for AppError to implement IntoResponse
///
/// Needed because of the orphan rule: `IntoResponse` and `AppError` both live
/// in other crates.
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    pub show_detailed_errors: bool,
}

impl HttpAppError {
    pub fn new(error: AppError, show_detailed_errors: bool) -> Self {
        Self {
            error,
            show_detailed_errors,
        }
    }
}

impl From<AppError> for HttpAppError {
    fn from(error: AppError) -> Self {
        HttpAppError::new(error, false)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, error_code, "Request rejected");
        }
        LogLevel::Info => {
            tracing::info!(error = %error, error_type, error_code, "Request rejected");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, error_code, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.error;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let detail = if self.show_detailed_errors {
            app_error.detailed_message()
        } else {
            None
        };
        let body = FailureResponse::new(app_error.client_message()).with_detail(detail);

        (status, Json(body)).into_response()
    }
}

/// Render a panic caught while handling a request as an unexpected-error 500.
pub fn panic_response(
    show_detailed_errors: bool,
    payload: Box<dyn Any + Send + 'static>,
) -> Response {
    let details = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    HttpAppError::new(
        AppError::Internal(format!("handler panicked: {}", details)),
        show_detailed_errors,
    )
    .into_response()
}
