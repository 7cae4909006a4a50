//! Mapping of `TicklistError` onto HTTP responses.
//!
//! Body shape: `{"error": {"code": "...", "message": "..."}}`. Internal and
//! upstream failures are logged in full but reported with a generic message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::{ErrorKind, TicklistError};

#[must_use]
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::BadRequest | ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::LoginUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Upstream => StatusCode::BAD_GATEWAY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for TicklistError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = match kind {
            ErrorKind::Internal => {
                tracing::error!(error = %self, "request failed");
                "internal server error".to_string()
            }
            ErrorKind::Upstream => {
                tracing::warn!(error = %self, "login provider request failed");
                "login provider request failed".to_string()
            }
            _ => {
                tracing::debug!(code = kind.code(), error = %self, "request rejected");
                self.to_string()
            }
        };

        let body = Json(json!({"error": {"code": kind.code(), "message": message}}));
        (status_for(kind), body).into_response()
    }
}
