//! Error types module
//!
//! All errors are unified under the `AppError` enum. Every variant is a
//! terminal condition: nothing in this service retries internally, and no
//! partial result is ever returned alongside an error.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for infrastructure faults the caller may retry
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
/// This trait allows errors to self-describe their HTTP response characteristics.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "HANDLE_NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable by the caller (re-upload, retry)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Handle not found: {0}")]
    HandleNotFound(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Encoding failed: {message}")]
    EncodingFailed {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            // Handled validation failure: the original backend answers 200
            // with an `error` part, and clients depend on that.
            AppError::UnsupportedFormat(_) => 200,
            AppError::HandleNotFound(_) => 404,
            AppError::StoreUnavailable(_) => 503,
            AppError::EncodingFailed { .. } => 500,
            AppError::InvalidInput(_) => 400,
            AppError::Internal(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AppError::HandleNotFound(_) => "HANDLE_NOT_FOUND",
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::EncodingFailed { .. } => "ENCODING_FAILED",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Re-upload (expired handle) or fix the request.
            AppError::UnsupportedFormat(_)
            | AppError::HandleNotFound(_)
            | AppError::InvalidInput(_) => true,
            // Transient infrastructure fault; the caller may retry the
            // whole request.
            AppError::StoreUnavailable(_) => true,
            AppError::EncodingFailed { .. } | AppError::Internal(_) => false,
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::EncodingFailed { message, .. } => {
                format!("Encoding failed: {}", message)
            }
            other => other.to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::UnsupportedFormat(_)
            | AppError::HandleNotFound(_)
            | AppError::InvalidInput(_) => LogLevel::Debug,
            AppError::StoreUnavailable(_) => LogLevel::Warn,
            AppError::EncodingFailed { .. } | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::UnsupportedFormat("bmp".into()).http_status_code(),
            200
        );
        assert_eq!(AppError::HandleNotFound("h1".into()).http_status_code(), 404);
        assert_eq!(
            AppError::StoreUnavailable("down".into()).http_status_code(),
            503
        );
        assert_eq!(AppError::Internal("boom".into()).http_status_code(), 500);
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            AppError::UnsupportedFormat(String::new()),
            AppError::HandleNotFound(String::new()),
            AppError::StoreUnavailable(String::new()),
            AppError::InvalidInput(String::new()),
            AppError::Internal(String::new()),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.error_code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_encoding_failed_carries_source() {
        let err = AppError::EncodingFailed {
            message: "corrupt payload".into(),
            source: anyhow::anyhow!("truncated stream"),
        };
        assert_eq!(err.http_status_code(), 500);
        assert!(err.client_message().contains("corrupt payload"));
        assert_eq!(err.log_level(), LogLevel::Error);
    }
}
