// Scan service
// Wires feature extraction, heuristics, classifier, redirect tracer and fusion

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::app_config::{AppConfig, ScannerConfig};
use crate::models::{AttachmentScanResult, ScanResult};
use crate::services::classifier::{clean_url_text, Classifier};
use crate::utils::attachment_rules::{score_attachment, AttachmentMeta};
use crate::utils::fusion::{fuse_with_advice, FusionWeights};
use crate::utils::redirect_tracer::{RedirectTracer, Transport};
use crate::utils::{heuristics, url_features};

/// Stateless scanning entry point; one instance is shared by all requests
pub struct ScanService {
    classifier: Arc<dyn Classifier>,
    tracer: RedirectTracer,
    scanner: ScannerConfig,
    fusion: FusionWeights,
}

impl ScanService {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        transport: Arc<dyn Transport>,
        scanner: ScannerConfig,
        fusion: FusionWeights,
    ) -> Self {
        Self {
            classifier,
            tracer: RedirectTracer::new(transport),
            scanner,
            fusion,
        }
    }

    pub fn from_config(
        config: &AppConfig,
        classifier: Arc<dyn Classifier>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self::new(classifier, transport, config.scanner.clone(), config.fusion)
    }

    pub fn classifier_available(&self) -> bool {
        self.classifier.is_available()
    }

    /// Score a URL. Always returns a complete result: parse problems degrade
    /// the features, trace failures become an error hop, and a missing
    /// classifier falls back to the heuristic score.
    pub async fn scan_url(&self, url: &str) -> ScanResult {
        let start_time = Instant::now();
        let url = url.trim();

        let features = url_features::extract(url);
        let (heuristic_score, signals) = heuristics::score(&features);
        let ml_probability = self.classifier.predict(&features, &clean_url_text(url));
        debug!(
            "Heuristic score {} for {} (ml_probability: {:?})",
            heuristic_score, url, ml_probability
        );

        let redirect_trace = self
            .tracer
            .trace(url, self.scanner.max_hops, self.scanner.redirect_timeout())
            .await;

        let (final_score, advice) = fuse_with_advice(&self.fusion, heuristic_score, ml_probability);

        info!(
            "Scanned {} in {}ms: final_score={} advice={} hops={}",
            url,
            start_time.elapsed().as_millis(),
            final_score,
            advice,
            redirect_trace.len()
        );

        ScanResult {
            features,
            heuristic_score,
            ml_probability,
            final_score,
            signals,
            redirect_trace,
            advice,
        }
    }

    /// Score attachment metadata with the attachment rule table
    pub fn scan_attachment(
        &self,
        filename: &str,
        mimetype: &str,
        filesize: u64,
    ) -> AttachmentScanResult {
        let meta = AttachmentMeta::new(filename, mimetype, filesize);
        let result = score_attachment(&meta);
        info!(
            "Scanned attachment {} ({} bytes): score={} advice={}",
            meta.filename,
            meta.filesize,
            result.score,
            result.advice.as_str()
        );
        result
    }
}
