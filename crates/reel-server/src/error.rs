//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`reel_core::Error`] so that route handlers
//! can return `Result<T, AppError>` and short-circuit with `?`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: reel_core::Error,
    request_id: Option<String>,
}

impl AppError {
    pub fn new(inner: reel_core::Error) -> Self {
        Self {
            inner,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: Option<String>) -> Self {
        self.request_id = id;
        self
    }
}

impl From<reel_core::Error> for AppError {
    fn from(e: reel_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in stream handler"
            );
        } else {
            tracing::debug!(status = %status, error = %self.inner, "Request rejected");
        }

        let code = match &self.inner {
            reel_core::Error::NotFound(_) => "not_found",
            reel_core::Error::Open { .. } => "open_error",
            reel_core::Error::NotAFile(_) => "not_a_file",
            reel_core::Error::Validation(_) => "validation_error",
            reel_core::Error::Database { .. } => "database_error",
            reel_core::Error::Io { .. } => "io_error",
            reel_core::Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.inner.to_string(),
            "code": code,
            "request_id": self.request_id,
        });

        (status, axum::Json(body)).into_response()
    }
}
