// Scan API handlers
// Thin wrappers: validate input, delegate to ScanService, shape the response

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::{
    app::AppState,
    models::{ScanAttachmentRequest, ScanAttachmentResponse, ScanUrlRequest, ScanUrlResponse},
    utils::{lowercase_or_empty, require_url, ScanError},
};

/// Score a URL
/// POST /scan
pub async fn scan_url(
    State(state): State<AppState>,
    payload: Result<Json<ScanUrlRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected scan request: {}", rejection.body_text());
            return ScanError::from(rejection).into_response();
        },
    };

    let url = match require_url(request.url.as_deref()) {
        Ok(url) => url,
        Err(e) => return e.into_response(),
    };

    let result = state.scan_service.scan_url(&url).await;
    Json(ScanUrlResponse::new(url, result)).into_response()
}

/// Score attachment metadata
/// POST /scan_attachment
pub async fn scan_attachment(
    State(state): State<AppState>,
    payload: Result<Json<ScanAttachmentRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected attachment scan request: {}", rejection.body_text());
            return ScanError::from(rejection).into_response();
        },
    };

    let filename = lowercase_or_empty(request.filename.as_deref());
    let mimetype = lowercase_or_empty(request.mimetype.as_deref());
    let filesize = request.filesize.unwrap_or(0);

    let result = state
        .scan_service
        .scan_attachment(&filename, &mimetype, filesize);

    Json(ScanAttachmentResponse {
        filename,
        mimetype,
        filesize,
        score: result.score,
        signals: result.signals,
        advice: result.advice,
    })
    .into_response()
}
