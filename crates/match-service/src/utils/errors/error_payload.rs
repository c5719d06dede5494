use axum::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

/// Body of every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorPayload {
    pub message: String,
    /// Mirrors the HTTP status.
    pub code: u16,
    /// Stable identifier such as `STORE_UNAVAILABLE`.
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorPayload {
    pub fn new(status: StatusCode, error_type: &str, message: impl Into<String>) -> Self {
        ErrorPayload {
            message: message.into(),
            code: status.as_u16(),
            r#type: error_type.to_string(),
            details: None,
        }
    }
}
