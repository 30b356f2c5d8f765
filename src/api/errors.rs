use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::application::dto::ErrorResponse;
use crate::application::errors::FileError;

/// API error response
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    pub fn internal_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "An internal storage error occurred",
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.kind.to_string(),
            message: self.message,
        });

        (self.status, body).into_response()
    }
}

impl From<FileError> for ApiError {
    fn from(err: FileError) -> Self {
        let status = match &err {
            FileError::InvalidName(_) => StatusCode::BAD_REQUEST,
            FileError::NotFound(_) => StatusCode::NOT_FOUND,
            FileError::AlreadyExists(_) => StatusCode::CONFLICT,
            FileError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            FileError::Incomplete { .. } => StatusCode::BAD_REQUEST,
            FileError::BodyRead(e) => {
                warn!(error = %e, "upload_body_read_failed");
                StatusCode::BAD_REQUEST
            }
            FileError::Storage(e) => {
                // Details stay in the log
                error!(error = %e, "storage_failure");
                return ApiError::internal_error();
            }
        };

        ApiError::new(status, err.kind(), err.to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, "invalid_name", rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::StorageError;

    #[test]
    fn test_business_errors_map_to_client_statuses() {
        let cases = [
            (FileError::InvalidName("x".into()), StatusCode::BAD_REQUEST),
            (FileError::NotFound("a".into()), StatusCode::NOT_FOUND),
            (FileError::AlreadyExists("a".into()), StatusCode::CONFLICT),
            (FileError::TooLarge { max: 1 }, StatusCode::PAYLOAD_TOO_LARGE),
            (
                FileError::Incomplete {
                    expected: 2,
                    actual: 1,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                FileError::BodyRead("connection reset".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, expected) in cases {
            let kind = err.kind();
            let api_err = ApiError::from(err);
            assert_eq!(api_err.status(), expected);
            assert_eq!(api_err.kind(), kind);
        }
    }

    #[test]
    fn test_storage_error_message_is_generic() {
        let err = FileError::Storage(StorageError::Internal(
            "/data/files/secret: permission denied".into(),
        ));

        let api_err = ApiError::from(err);

        assert_eq!(api_err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_err.kind(), "internal_error");
        assert!(!api_err.message().contains("/data"));
    }
}
