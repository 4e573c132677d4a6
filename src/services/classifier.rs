// Classifier adapter
// Optional probability source consulted alongside the heuristic scorer

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{UrlFeatures, FEATURE_NAMES};

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Raised only while loading a model; prediction itself never fails
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Model file not found: {0}")]
    ModelNotFound(String),

    #[error("Failed to read model: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model features do not match: {0}")]
    FeatureMismatch(String),
}

// =============================================================================
// ADAPTER TRAIT
// =============================================================================

/// Supplies a phishing probability in 0..=1, or `None` when no usable
/// prediction is available
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &UrlFeatures, url_text: &str) -> Option<f64>;

    fn is_available(&self) -> bool {
        true
    }
}

/// Stand-in used when no model is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClassifier;

impl Classifier for NoClassifier {
    fn predict(&self, _features: &UrlFeatures, _url_text: &str) -> Option<f64> {
        None
    }

    fn is_available(&self) -> bool {
        false
    }
}

// =============================================================================
// LINEAR (LOGISTIC) MODEL
// =============================================================================

#[derive(Debug, Deserialize)]
struct LinearModelFile {
    feature_order: Vec<String>,
    weights: Vec<f64>,
    intercept: f64,
}

/// Logistic regression over the numeric feature vector
#[derive(Debug, Clone, PartialEq)]
pub struct LinearClassifier {
    weights: [f64; 10],
    intercept: f64,
}

impl LinearClassifier {
    pub fn new(weights: [f64; 10], intercept: f64) -> Self {
        Self { weights, intercept }
    }

    /// Parse `{"feature_order": [...], "weights": [...], "intercept": f}`.
    /// `feature_order` must list the feature names in their declared order.
    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let file: LinearModelFile = serde_json::from_str(json)?;

        if file.feature_order.len() != FEATURE_NAMES.len()
            || file
                .feature_order
                .iter()
                .zip(FEATURE_NAMES.iter())
                .any(|(got, expected)| got != expected)
        {
            return Err(ClassifierError::FeatureMismatch(format!(
                "expected {:?}, got {:?}",
                FEATURE_NAMES, file.feature_order
            )));
        }

        let weights: [f64; 10] = file.weights.as_slice().try_into().map_err(|_| {
            ClassifierError::FeatureMismatch(format!(
                "expected {} weights, got {}",
                FEATURE_NAMES.len(),
                file.weights.len()
            ))
        })?;

        Ok(Self::new(weights, file.intercept))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ClassifierError::ModelNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

impl Classifier for LinearClassifier {
    /// Uses only the feature record; the URL text is ignored by this model
    fn predict(&self, features: &UrlFeatures, _url_text: &str) -> Option<f64> {
        let logit: f64 = features
            .as_vector()
            .iter()
            .zip(self.weights.iter())
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.intercept;

        let probability = 1.0 / (1.0 + (-logit).exp());
        if probability.is_finite() && (0.0..=1.0).contains(&probability) {
            Some(probability)
        } else {
            None
        }
    }
}

// =============================================================================
// LOADING AND TEXT PREPARATION
// =============================================================================

/// Build the process classifier from an optional model path. Any load
/// failure degrades to `NoClassifier`.
pub fn load_classifier(model_path: Option<&str>) -> Arc<dyn Classifier> {
    let Some(path) = model_path else {
        info!("No classifier model configured, using heuristic scoring only");
        return Arc::new(NoClassifier);
    };

    match LinearClassifier::from_path(path) {
        Ok(model) => {
            info!("Loaded classifier model from {}", path);
            Arc::new(model)
        },
        Err(e) => {
            warn!("Classifier unavailable ({}), using heuristic scoring only", e);
            Arc::new(NoClassifier)
        },
    }
}

lazy_static! {
    static ref DISALLOWED_CHARS: Regex =
        Regex::new(r"[^a-z0-9:/\.\-_]").expect("Invalid cleaning pattern regex");
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("Invalid whitespace regex");
}

/// Lowercase, blank out characters outside `[a-z0-9:/._-]`, collapse blanks
pub fn clean_url_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let replaced = DISALLOWED_CHARS.replace_all(&lower, " ");
    WHITESPACE_RUN.replace_all(&replaced, " ").trim().to_string()
}
