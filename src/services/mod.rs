// Services module for the PhishGuard backend
// Business logic layer for the application

pub mod classifier;
pub mod scan;

// Re-export commonly used services
pub use classifier::{
    clean_url_text, load_classifier, Classifier, ClassifierError, LinearClassifier, NoClassifier,
};
pub use scan::ScanService;
