// Utility modules for the PhishGuard backend

pub mod attachment_rules;
pub mod fusion;
pub mod heuristics;
pub mod redirect_tracer;
pub mod scan_errors;
pub mod url_features;
pub mod validation;

pub use fusion::{fuse, FusionWeights, DEFAULT_FUSION_WEIGHTS};
pub use redirect_tracer::{
    FetchOutcome, HttpExchange, RedirectTracer, ReqwestTransport, Transport, TransportError,
};
pub use scan_errors::ScanError;
pub use validation::{lowercase_or_empty, require_url};
