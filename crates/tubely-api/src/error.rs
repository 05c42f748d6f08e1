//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Library errors (storage, validation, media tools)
//! are mapped onto `AppError` here so every failure renders the same JSON body with a status
//! taken from `ErrorMetadata`.

use axum::{
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tubely_core::config::is_production_environment;
use tubely_core::{AppError, ErrorMetadata, LogLevel};
use tubely_processing::{MediaToolError, ValidationError};
use tubely_storage::StorageError;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    fn from_app_error(app_error: &AppError, include_details: bool) -> Self {
        Self {
            error: app_error.client_message(),
            details: include_details.then(|| app_error.detailed_message()),
            error_type: include_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from tubely-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        HttpAppError(err.into_app_error())
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| is_production_environment(&env))
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Stack-level detail stays server-side in production and for sensitive errors.
        let include_details = !is_production_env() && !app_error.is_sensitive();
        let body = ErrorResponse::from_app_error(app_error, include_details);

        (status, Json(body)).into_response()
    }
}

/// Conversion of library errors onto the unified `AppError`.
///
/// `AppError` and the library error enums live in other crates, so `From` cannot be
/// implemented between them here.
pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}

impl IntoAppError for AppError {
    fn into_app_error(self) -> AppError {
        self
    }
}

impl IntoAppError for StorageError {
    fn into_app_error(self) -> AppError {
        match self {
            StorageError::StoreUnavailable(msg) => AppError::Storage(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
            // A stored reference we cannot decompose is a data-integrity error, not transient.
            StorageError::ReferenceMalformed(msg) => AppError::Internal(msg),
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoAppError for ValidationError {
    fn into_app_error(self) -> AppError {
        match self {
            ValidationError::FileTooLarge { size, max } => {
                AppError::PayloadTooLarge(format!("{} bytes exceeds max {} bytes", size, max))
            }
            ValidationError::EmptyFile => AppError::InvalidInput("File is empty".to_string()),
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}

impl IntoAppError for MediaToolError {
    fn into_app_error(self) -> AppError {
        match self {
            MediaToolError::ProbeFailed(_)
            | MediaToolError::NoStreamInfo(_)
            | MediaToolError::RemuxFailed(_)
            | MediaToolError::Timeout { .. } => AppError::ProcessingFailure(self.to_string()),
            MediaToolError::Spawn { .. } | MediaToolError::Io(_) => {
                AppError::Internal(self.to_string())
            }
        }
    }
}

impl IntoAppError for MultipartError {
    fn into_app_error(self) -> AppError {
        if self.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(self.body_text())
        } else {
            AppError::InvalidInput(format!("Failed to read multipart body: {}", self.body_text()))
        }
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(err.into_app_error())
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        HttpAppError(err.into_app_error())
    }
}

impl From<MediaToolError> for HttpAppError {
    fn from(err: MediaToolError) -> Self {
        HttpAppError(err.into_app_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_unavailable_is_retryable() {
        let HttpAppError(app_err) =
            StorageError::StoreUnavailable("connection reset".to_string()).into();
        assert!(matches!(app_err, AppError::Storage(ref msg) if msg == "connection reset"));
        assert_eq!(app_err.http_status_code(), 500);
        assert!(app_err.is_recoverable());
    }

    #[test]
    fn test_from_storage_error_malformed_reference() {
        let HttpAppError(app_err) =
            StorageError::ReferenceMalformed("no comma".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
        assert_eq!(app_err.http_status_code(), 500);
    }

    #[test]
    fn test_from_storage_error_io_error() {
        let io_err = std::io::Error::other("disk full");
        let HttpAppError(app_err) = StorageError::IoError(io_err).into();
        match app_err {
            AppError::Storage(msg) => assert!(msg.contains("disk full")),
            other => panic!("Expected Storage variant, got {:?}", other),
        }
    }

    #[test]
    fn test_from_validation_error_unsupported_media_type() {
        let HttpAppError(app_err) = ValidationError::UnsupportedMediaType {
            media_type: "image/gif".to_string(),
            allowed: vec!["image/jpeg".to_string(), "image/png".to_string()],
        }
        .into();
        match app_err {
            AppError::InvalidInput(ref msg) => assert!(msg.contains("image/gif")),
            ref other => panic!("Expected InvalidInput variant, got {:?}", other),
        }
        assert_eq!(app_err.http_status_code(), 400);
    }

    #[test]
    fn test_from_validation_error_file_too_large() {
        let HttpAppError(app_err) = ValidationError::FileTooLarge {
            size: 1000,
            max: 500,
        }
        .into();
        match app_err {
            AppError::PayloadTooLarge(msg) => {
                assert!(msg.contains("1000"));
                assert!(msg.contains("500"));
            }
            other => panic!("Expected PayloadTooLarge variant, got {:?}", other),
        }
    }

    #[test]
    fn test_media_tool_failures_are_not_retryable() {
        for err in [
            MediaToolError::ProbeFailed("exit status: 1".to_string()),
            MediaToolError::NoStreamInfo("no streams found".to_string()),
            MediaToolError::RemuxFailed("empty output".to_string()),
            MediaToolError::Timeout {
                tool: "ffmpeg",
                timeout: std::time::Duration::from_secs(300),
            },
        ] {
            let app_err = err.into_app_error();
            assert!(matches!(app_err, AppError::ProcessingFailure(_)));
            assert_eq!(app_err.http_status_code(), 500);
            assert!(!app_err.is_recoverable());
        }
    }

    #[test]
    fn test_error_response_hides_details_when_asked() {
        let app_err = AppError::NotFound("Video 42 not found".to_string());

        let hidden = serde_json::to_value(ErrorResponse::from_app_error(&app_err, false)).unwrap();
        assert!(hidden.get("details").is_none());
        assert!(hidden.get("error_type").is_none());

        let shown = serde_json::to_value(ErrorResponse::from_app_error(&app_err, true)).unwrap();
        assert_eq!(shown["error_type"], "NotFound");
        assert_eq!(shown["code"], "NOT_FOUND");
        assert_eq!(shown["recoverable"], false);
    }
}
