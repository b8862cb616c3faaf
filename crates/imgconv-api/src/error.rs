//! HTTP error response conversion
//!
//! **Handler pattern:** return `Result<impl IntoResponse, HttpAppError>`
//! and use `AppError` for errors so they render consistently. The error
//! boundary of this service is multipart: every failure becomes a body
//! with a single `error` part, framed by a fresh boundary, with the status
//! code the error's metadata dictates.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use imgconv_core::{AppError, ErrorMetadata, LogLevel};
use imgconv_store::StoreError;

use crate::multipart::{self, MultipartPackage};

/// Wrapper type for AppError to implement IntoResponse.
/// Necessary because of the orphan rule: IntoResponse is external and
/// AppError lives in imgconv-core.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<StoreError> for HttpAppError {
    fn from(err: StoreError) -> Self {
        HttpAppError(store_error(err))
    }
}

/// Map store failures onto the service taxonomy. Expiry and absence are the
/// same observable condition.
pub fn store_error(err: StoreError) -> AppError {
    match err {
        StoreError::NotFound(handle) => AppError::HandleNotFound(handle),
        StoreError::Unavailable(message) => AppError::StoreUnavailable(message),
        StoreError::Corrupt { handle, message } => {
            AppError::Internal(format!("corrupt record for {}: {}", handle, message))
        }
    }
}

fn log_error(error: &AppError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, code = code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, code = code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, code = code, "Request failed");
        }
    }
}

/// Build the response for a packaged multipart body.
pub fn multipart_response(status: StatusCode, package: MultipartPackage) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, package.content_type())],
        package.body,
    )
        .into_response()
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        log_error(app_error);

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let package = multipart::pack_error(&app_error.client_message());

        multipart_response(status, package)
    }
}
