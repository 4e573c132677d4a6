// Integration tests for the redirect tracer against fake and real transports
mod common;

use common::{spawn_redirect_server, unused_address, FakeTransport};
use phishguard_backend_core::{
    models::RedirectHop,
    utils::{RedirectTracer, ReqwestTransport, TransportError},
};
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

fn response(status: u16, url: &str) -> RedirectHop {
    RedirectHop::Response {
        status,
        url: url.to_string(),
    }
}

#[tokio::test]
async fn test_direct_response_reports_one_hop() {
    let transport = Arc::new(FakeTransport::direct(200, "https://example.com/"));
    let tracer = RedirectTracer::new(transport.clone());

    let hops = tracer.trace("https://example.com/", 6, TIMEOUT).await;

    assert_eq!(hops, vec![response(200, "https://example.com/")]);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_transport_yields_timeout_hop() {
    let transport = Arc::new(
        FakeTransport::direct(200, "https://slow.example/").with_delay(Duration::from_secs(30)),
    );
    let tracer = RedirectTracer::new(transport);

    let hops = tracer
        .trace("https://slow.example/", 6, Duration::from_secs(5))
        .await;

    assert_eq!(hops.len(), 1);
    match &hops[0] {
        RedirectHop::Error { error } => assert!(error.starts_with("Request timed out")),
        other => panic!("Expected error hop, got {:?}", other),
    }
}

#[tokio::test]
async fn test_hop_count_never_exceeds_max_hops_plus_one() {
    for chain_length in [0usize, 1, 3, 6, 7, 20] {
        let redirects: Vec<(u16, String)> = (0..chain_length)
            .map(|i| (302, format!("http://r{}.example/", i)))
            .collect();
        let borrowed: Vec<(u16, &str)> = redirects.iter().map(|(s, u)| (*s, u.as_str())).collect();
        let tracer = RedirectTracer::new(Arc::new(FakeTransport::chain(
            &borrowed,
            200,
            "http://final.example/",
        )));

        for max_hops in [0usize, 1, 6] {
            let hops = tracer.trace("http://r0.example/", max_hops, TIMEOUT).await;
            assert_eq!(hops.len(), chain_length.min(max_hops) + 1);
            assert_eq!(hops.last(), Some(&response(200, "http://final.example/")));
        }
    }
}

#[tokio::test]
async fn test_transport_error_message_is_carried() {
    let tracer = RedirectTracer::new(Arc::new(FakeTransport::failing(
        TransportError::Request("tls handshake failed".to_string()),
    )));

    let hops = tracer.trace("https://broken.example/", 6, TIMEOUT).await;
    assert_eq!(
        hops,
        vec![RedirectHop::Error {
            error: "Request failed: tls handshake failed".to_string()
        }]
    );
}

// =============================================================================
// REAL TRANSPORT
// =============================================================================

fn real_tracer(limit: usize) -> RedirectTracer {
    let transport = ReqwestTransport::new("phishguard-test", limit).expect("Failed to build transport");
    RedirectTracer::new(Arc::new(transport))
}

#[tokio::test]
async fn test_real_redirect_chain_is_recorded_in_order() {
    let addr = spawn_redirect_server().await;
    let base = format!("http://{}", addr);

    let hops = real_tracer(30)
        .trace(&format!("{}/start", base), 6, TIMEOUT)
        .await;

    assert_eq!(
        hops,
        vec![
            response(302, &format!("{}/start", base)),
            response(301, &format!("{}/middle", base)),
            response(200, &format!("{}/end", base)),
        ]
    );
}

#[tokio::test]
async fn test_real_chain_truncated_to_max_hops() {
    let addr = spawn_redirect_server().await;
    let base = format!("http://{}", addr);

    let hops = real_tracer(30)
        .trace(&format!("{}/start", base), 1, TIMEOUT)
        .await;

    assert_eq!(
        hops,
        vec![
            response(302, &format!("{}/start", base)),
            response(200, &format!("{}/end", base)),
        ]
    );
}

#[tokio::test]
async fn test_relative_location_is_resolved() {
    let addr = spawn_redirect_server().await;
    let base = format!("http://{}", addr);

    let hops = real_tracer(30)
        .trace(&format!("{}/relative", base), 6, TIMEOUT)
        .await;

    assert_eq!(hops.len(), 2);
    assert_eq!(hops[1], response(200, &format!("{}/end", base)));
}

#[tokio::test]
async fn test_redirect_loop_hits_transport_limit() {
    let addr = spawn_redirect_server().await;

    let hops = real_tracer(5)
        .trace(&format!("http://{}/loop", addr), 6, TIMEOUT)
        .await;

    assert_eq!(
        hops,
        vec![RedirectHop::Error {
            error: "Exceeded 5 redirects".to_string()
        }]
    );
}

#[tokio::test]
async fn test_connection_refused_yields_error_hop() {
    let addr = unused_address();

    let hops = real_tracer(30)
        .trace(&format!("http://{}/", addr), 6, TIMEOUT)
        .await;

    assert_eq!(hops.len(), 1);
    match &hops[0] {
        RedirectHop::Error { error } => assert!(error.starts_with("Connection failed")),
        other => panic!("Expected error hop, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let addr = spawn_redirect_server().await;

    let hops = real_tracer(30)
        .trace(
            &format!("http://{}/slow", addr),
            6,
            Duration::from_millis(100),
        )
        .await;

    assert_eq!(
        hops,
        vec![RedirectHop::Error {
            error: "Request timed out after 100ms".to_string()
        }]
    );
}
