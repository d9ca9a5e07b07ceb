use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// An error on its way to the client.
///
/// `message` is exactly what the caller sees. Provider detail never goes in
/// here; it is logged where the error is converted.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 400 Bad Request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Log `source` server-side and answer with a generic 500 `msg`.
    pub fn provider(msg: &str, source: impl fmt::Display) -> Self {
        tracing::error!("{}: {}", msg, source);
        Self::internal(msg)
    }

    /// A multipart body that could not be read to the end.
    ///
    /// Only the body limit keeps its own status (413); every other failure is
    /// a generic 500 `msg`.
    pub fn multipart(msg: &str, source: MultipartError) -> Self {
        let status = source.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::warn!("{}: {}", msg, source.body_text());
            return Self::new(status, msg);
        }
        Self::provider(msg, source.body_text())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));

        (self.status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::provider("Internal server error", err)
    }
}
