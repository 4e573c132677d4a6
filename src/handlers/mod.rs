// Scan API handlers

pub mod scan;

use crate::app::AppState;
use axum::{routing::post, Router};

// Scan routes
pub fn scan_routes() -> Router<AppState> {
    Router::new()
        .route("/scan", post(scan::scan_url))
        .route("/scan_attachment", post(scan::scan_attachment))
}
