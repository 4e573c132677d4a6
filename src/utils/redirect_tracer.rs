// Redirect tracing
// One bounded outbound fetch per scan, recorded as a hop chain

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::models::RedirectHop;

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Exceeded {limit} redirects")]
    TooManyRedirects { limit: usize },

    #[error("Request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else if error.is_builder() {
            TransportError::InvalidUrl(error.to_string())
        } else {
            TransportError::Request(error.to_string())
        }
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// A single response observed while fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpExchange {
    pub status: u16,
    pub url: String,
}

/// Redirect responses in visit order, then the response that ended the fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub history: Vec<HttpExchange>,
    pub final_response: HttpExchange,
}

/// Fetches a URL following redirects under its own internal cap
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchOutcome, TransportError>;
}

pub const DEFAULT_TRANSPORT_REDIRECT_LIMIT: usize = 30;

/// reqwest-backed transport. Redirects are followed here rather than by
/// reqwest so that every intermediate response can be recorded.
pub struct ReqwestTransport {
    client: reqwest::Client,
    redirect_limit: usize,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str, redirect_limit: usize) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            redirect_limit,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(&self, url: &str) -> Result<FetchOutcome, TransportError> {
        let mut current = Url::parse(url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        let mut history = Vec::new();

        loop {
            if !matches!(current.scheme(), "http" | "https") {
                return Err(TransportError::InvalidUrl(format!(
                    "unsupported scheme: {}",
                    current.scheme()
                )));
            }

            let response = self.client.get(current.clone()).send().await?;
            let status = response.status();
            let exchange = HttpExchange {
                status: status.as_u16(),
                url: response.url().to_string(),
            };

            let location = if status.is_redirection() {
                response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned)
            } else {
                None
            };

            let Some(location) = location else {
                return Ok(FetchOutcome {
                    history,
                    final_response: exchange,
                });
            };

            if history.len() >= self.redirect_limit {
                return Err(TransportError::TooManyRedirects {
                    limit: self.redirect_limit,
                });
            }

            let next = current
                .join(&location)
                .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", location, e)))?;
            debug!("Redirect {} -> {} ({})", current, next, exchange.status);
            history.push(exchange);
            current = next;
        }
    }
}

// =============================================================================
// TRACER
// =============================================================================

pub struct RedirectTracer {
    transport: Arc<dyn Transport>,
}

impl RedirectTracer {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Trace redirects for `url`. At most `max_hops` intermediate hops are
    /// reported, followed by the final response; the fetch itself is capped
    /// only by the transport. Any failure yields a single error hop.
    pub async fn trace(&self, url: &str, max_hops: usize, timeout: Duration) -> Vec<RedirectHop> {
        let outcome = match tokio::time::timeout(timeout, self.transport.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(timeout)),
        };

        match outcome {
            Ok(FetchOutcome {
                history,
                final_response,
            }) => {
                let mut hops: Vec<RedirectHop> = history
                    .into_iter()
                    .take(max_hops)
                    .map(|exchange| RedirectHop::Response {
                        status: exchange.status,
                        url: exchange.url,
                    })
                    .collect();
                hops.push(RedirectHop::Response {
                    status: final_response.status,
                    url: final_response.url,
                });
                hops
            },
            Err(e) => {
                warn!("Redirect trace failed for {}: {}", url, e);
                vec![RedirectHop::Error {
                    error: e.to_string(),
                }]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedTransport(Result<FetchOutcome, TransportError>);

    #[async_trait]
    impl Transport for CannedTransport {
        async fn fetch(&self, _url: &str) -> Result<FetchOutcome, TransportError> {
            self.0.clone()
        }
    }

    fn exchange(status: u16, url: &str) -> HttpExchange {
        HttpExchange {
            status,
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_direct_response_is_single_hop() {
        let tracer = RedirectTracer::new(Arc::new(CannedTransport(Ok(FetchOutcome {
            history: vec![],
            final_response: exchange(200, "https://example.com/"),
        }))));

        let hops = tracer
            .trace("https://example.com/", 6, Duration::from_secs(1))
            .await;
        assert_eq!(
            hops,
            vec![RedirectHop::Response {
                status: 200,
                url: "https://example.com/".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_error_is_single_error_hop() {
        let tracer = RedirectTracer::new(Arc::new(CannedTransport(Err(
            TransportError::Connect("connection refused".to_string()),
        ))));

        let hops = tracer.trace("http://down.example/", 6, Duration::from_secs(1)).await;
        assert_eq!(hops.len(), 1);
        assert_eq!(
            hops[0],
            RedirectHop::Error {
                error: "Connection failed: connection refused".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_recorded_chain_is_truncated() {
        let history = (0..10)
            .map(|i| exchange(302, &format!("http://hop{}.example/", i)))
            .collect();
        let tracer = RedirectTracer::new(Arc::new(CannedTransport(Ok(FetchOutcome {
            history,
            final_response: exchange(200, "http://end.example/"),
        }))));

        let hops = tracer.trace("http://hop0.example/", 3, Duration::from_secs(1)).await;
        assert_eq!(hops.len(), 4);
        assert_eq!(
            hops[2],
            RedirectHop::Response {
                status: 302,
                url: "http://hop2.example/".to_string()
            }
        );
        assert_eq!(
            hops[3],
            RedirectHop::Response {
                status: 200,
                url: "http://end.example/".to_string()
            }
        );

        let hops = tracer.trace("http://hop0.example/", 0, Duration::from_secs(1)).await;
        assert_eq!(hops.len(), 1);
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let transport = ReqwestTransport::new("test-agent", 5).unwrap();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let result = runtime.block_on(transport.fetch("ftp://example.com/file"));
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));

        let result = runtime.block_on(transport.fetch("not a url"));
        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }
}
