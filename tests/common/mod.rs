// Common test utilities: fake transports, fixed classifiers, a local redirect server
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use phishguard_backend_core::{
    app_config::ScannerConfig,
    models::UrlFeatures,
    services::{Classifier, NoClassifier, ScanService},
    utils::{FetchOutcome, FusionWeights, HttpExchange, Transport, TransportError},
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// FAKE TRANSPORT
// =============================================================================

/// Transport returning a canned outcome, optionally after a delay
pub struct FakeTransport {
    outcome: Result<FetchOutcome, TransportError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeTransport {
    pub fn direct(status: u16, url: &str) -> Self {
        Self::chain(&[], status, url)
    }

    /// `redirects` are (status, url) pairs visited before the final response
    pub fn chain(redirects: &[(u16, &str)], status: u16, url: &str) -> Self {
        Self {
            outcome: Ok(FetchOutcome {
                history: redirects
                    .iter()
                    .map(|(s, u)| HttpExchange {
                        status: *s,
                        url: u.to_string(),
                    })
                    .collect(),
                final_response: HttpExchange {
                    status,
                    url: url.to_string(),
                },
            }),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: TransportError) -> Self {
        Self {
            outcome: Err(error),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn fetch(&self, _url: &str) -> Result<FetchOutcome, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}

// =============================================================================
// CLASSIFIERS
// =============================================================================

/// Always returns the same probability and records the text it was given
pub struct FixedClassifier {
    probability: Option<f64>,
    pub seen_text: Mutex<Vec<String>>,
}

impl FixedClassifier {
    pub fn new(probability: Option<f64>) -> Self {
        Self {
            probability,
            seen_text: Mutex::new(Vec::new()),
        }
    }
}

impl Classifier for FixedClassifier {
    fn predict(&self, _features: &UrlFeatures, url_text: &str) -> Option<f64> {
        self.seen_text.lock().unwrap().push(url_text.to_string());
        self.probability
    }
}

// =============================================================================
// SERVICE BUILDERS
// =============================================================================

pub fn test_scanner_config() -> ScannerConfig {
    ScannerConfig {
        max_hops: 6,
        redirect_timeout_ms: 1000,
        ..ScannerConfig::default()
    }
}

pub fn scan_service(transport: Arc<dyn Transport>) -> ScanService {
    ScanService::new(
        Arc::new(NoClassifier),
        transport,
        test_scanner_config(),
        FusionWeights::default(),
    )
}

pub fn scan_service_with_classifier(
    classifier: Arc<dyn Classifier>,
    transport: Arc<dyn Transport>,
) -> ScanService {
    ScanService::new(
        classifier,
        transport,
        test_scanner_config(),
        FusionWeights::default(),
    )
}

// =============================================================================
// LOCAL REDIRECT SERVER
// =============================================================================

fn redirect(status: StatusCode, location: &'static str) -> impl IntoResponse {
    (status, [(header::LOCATION, location)])
}

/// Serve a small redirect graph on 127.0.0.1 and return its address
///
/// /start -> 302 /middle -> 301 /end -> 200
/// /loop  -> 302 /loop (forever)
/// /relative -> 302 end (resolved against the current URL)
/// /slow  -> 200 after two seconds
pub async fn spawn_redirect_server() -> SocketAddr {
    let app = Router::new()
        .route("/start", get(|| async { redirect(StatusCode::FOUND, "/middle") }))
        .route(
            "/middle",
            get(|| async { redirect(StatusCode::MOVED_PERMANENTLY, "/end") }),
        )
        .route("/end", get(|| async { "landing page" }))
        .route("/loop", get(|| async { redirect(StatusCode::FOUND, "/loop") }))
        .route("/relative", get(|| async { redirect(StatusCode::FOUND, "end") }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "finally"
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read test server address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    addr
}

/// An address nothing is listening on
pub fn unused_address() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    drop(listener);
    addr
}
