// URL scan models
// Plain value types produced by a single scan invocation

use serde::{Deserialize, Serialize};

// =============================================================================
// FEATURE RECORD
// =============================================================================

/// Names of the feature fields, in the order `UrlFeatures::as_vector` emits them
pub const FEATURE_NAMES: [&str; 10] = [
    "url_length",
    "host_length",
    "host_entropy",
    "has_ip",
    "has_at_symbol",
    "dot_count",
    "suspicious_word_count",
    "is_https",
    "uses_shortener",
    "path_token_count",
];

/// Lexical and host signals extracted from a submitted URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlFeatures {
    pub url_length: usize,
    pub host_length: usize,
    pub host_entropy: f64,
    pub has_ip: bool,
    pub has_at_symbol: bool,
    pub dot_count: usize,
    pub suspicious_word_count: usize,
    pub is_https: bool,
    pub uses_shortener: bool,
    pub path_token_count: usize,
}

impl UrlFeatures {
    /// Numeric view of the record, booleans as 0.0/1.0, ordered as `FEATURE_NAMES`
    pub fn as_vector(&self) -> [f64; 10] {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        [
            self.url_length as f64,
            self.host_length as f64,
            self.host_entropy,
            flag(self.has_ip),
            flag(self.has_at_symbol),
            self.dot_count as f64,
            self.suspicious_word_count as f64,
            flag(self.is_https),
            flag(self.uses_shortener),
            self.path_token_count as f64,
        ]
    }
}

// =============================================================================
// SIGNALS
// =============================================================================

/// Identifies the heuristic rule that produced a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicRuleId {
    IpHost,
    AtSymbol,
    Shortener,
    SuspiciousWords,
    LongUrl,
    HighHostEntropy,
    NotHttps,
}

/// Explanation emitted by a fired heuristic rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub message: String,
    pub rule: HeuristicRuleId,
}

// =============================================================================
// REDIRECT TRACE
// =============================================================================

/// One step of a redirect chain, or the terminal failure of the trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RedirectHop {
    Response { status: u16, url: String },
    Error { error: String },
}

impl RedirectHop {
    pub fn is_error(&self) -> bool {
        matches!(self, RedirectHop::Error { .. })
    }
}

// =============================================================================
// ADVICE AND RESULT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advice {
    Low,
    Medium,
    High,
}

impl Advice {
    /// Thresholds: >= 70 is High, >= 40 is Medium, everything below is Low
    pub fn from_score(final_score: u8) -> Self {
        match final_score {
            70.. => Advice::High,
            40..=69 => Advice::Medium,
            _ => Advice::Low,
        }
    }

    /// User-facing advice text
    pub fn message(&self) -> &'static str {
        match self {
            Advice::High => "High risk — do NOT click.",
            Advice::Medium => "Medium risk — be cautious.",
            Advice::Low => "Low risk.",
        }
    }
}

impl std::fmt::Display for Advice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advice::Low => write!(f, "Low risk"),
            Advice::Medium => write!(f, "Medium risk"),
            Advice::High => write!(f, "High risk"),
        }
    }
}

/// Complete outcome of scanning one URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub features: UrlFeatures,
    pub heuristic_score: u8,
    pub ml_probability: Option<f64>,
    pub final_score: u8,
    pub signals: Vec<Signal>,
    pub redirect_trace: Vec<RedirectHop>,
    pub advice: Advice,
}

// =============================================================================
// API REQUEST / RESPONSE
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanUrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Wire shape of `POST /scan`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanUrlResponse {
    pub url: String,
    pub features: UrlFeatures,
    pub heuristic_score: u8,
    pub ml_prob: Option<f64>,
    pub final_score: u8,
    pub signals: Vec<String>,
    pub redirect_trace: Vec<RedirectHop>,
    pub advice: String,
}

impl ScanUrlResponse {
    pub fn new(url: String, result: ScanResult) -> Self {
        Self {
            url,
            features: result.features,
            heuristic_score: result.heuristic_score,
            ml_prob: result.ml_probability,
            final_score: result.final_score,
            signals: result.signals.into_iter().map(|s| s.message).collect(),
            redirect_trace: result.redirect_trace,
            advice: result.advice.message().to_string(),
        }
    }
}
