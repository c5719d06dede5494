use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::repositories::StoreError;

use super::error_payload::ErrorPayload;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Self-like, nil identifiers or an unusable message body. Raised before any store call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("The data store is unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniquenessConflict => {
                AppError::Conflict("record already exists".to_string())
            }
            StoreError::UnknownReference(_) => {
                AppError::NotFound("user does not exist".to_string())
            }
            StoreError::Unavailable(reason) => AppError::StoreUnavailable(reason),
        }
    }
}

impl AppError {
    pub fn code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => "INVALID_ARGUMENT",
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.code();
        let payload = ErrorPayload::new(status, self.error_type(), self.to_string());

        (status, Json(payload)).into_response()
    }
}
