pub mod attachment;
pub mod scan;

// Re-export common types
pub use attachment::{
    AttachmentAdvice, AttachmentScanResult, ScanAttachmentRequest, ScanAttachmentResponse,
};
pub use scan::{
    Advice, HeuristicRuleId, RedirectHop, ScanResult, ScanUrlRequest, ScanUrlResponse, Signal,
    UrlFeatures, FEATURE_NAMES,
};
