// Library exports for the PhishGuard backend
// Scoring core plus the HTTP shell that serves it

pub mod app;
pub mod app_config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{AppConfig, ConfigError};
pub use models::{
    Advice, AttachmentAdvice, AttachmentScanResult, RedirectHop, ScanResult, Signal, UrlFeatures,
};
pub use services::{Classifier, ScanService};
pub use utils::{ReqwestTransport, Transport, TransportError};

/// Build application state from configuration: load the classifier once
/// and create the outbound transport
pub fn initialize_app_state(config: AppConfig) -> Result<AppState, TransportError> {
    let classifier = services::load_classifier(config.classifier.model_path.as_deref());

    info!(
        "Initializing redirect transport (max_hops={}, timeout={}ms, transport_limit={})",
        config.scanner.max_hops,
        config.scanner.redirect_timeout_ms,
        config.scanner.transport_redirect_limit
    );
    let transport = Arc::new(ReqwestTransport::new(
        &config.scanner.user_agent,
        config.scanner.transport_redirect_limit,
    )?);

    let scan_service = ScanService::from_config(&config, classifier, transport);
    Ok(AppState::new(config, scan_service))
}

/// Full router with scan routes, health check, CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::scan_routes())
        .route("/health", get(health_check))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::dynamic_cors_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Health check handler
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "phishguard-backend",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": state.config.server.environment.to_string(),
        "components": {
            "classifier": if state.scan_service.classifier_available() { "loaded" } else { "unavailable" }
        }
    }))
}
