// Request-boundary errors for the scan API
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// The only failures that reach a caller. Everything past input validation
/// degrades inside the scan result instead of erroring.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("no url provided")]
    EmptyUrl,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        let status = StatusCode::BAD_REQUEST;
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ScanError {
    fn from(rejection: JsonRejection) -> Self {
        ScanError::InvalidRequest(rejection.body_text())
    }
}
