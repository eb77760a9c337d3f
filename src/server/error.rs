//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::{MultirouteError, ParseError};

/// Everything an analysis endpoint can fail with.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Rejected before dispatch; the backend was not called.
    #[error(transparent)]
    Request(#[from] ParseError),

    /// The backend call failed; its message is reported verbatim.
    #[error(transparent)]
    Backend(#[from] MultirouteError),
}

impl ApiError {
    /// Convert to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Request(ParseError::Malformed(_)) => StatusCode::BAD_REQUEST,
            ApiError::Request(ParseError::UnsupportedMedia(_)) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            ApiError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": self.to_string(),
            "code": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}
