// Centralized configuration management for the PhishGuard backend
// Load ALL env vars ONCE at startup, then pass the struct around explicitly

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::utils::fusion::{FusionWeights, DEFAULT_FUSION_WEIGHTS};
use crate::utils::redirect_tracer::DEFAULT_TRANSPORT_REDIRECT_LIMIT;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub scanner: ScannerConfig,
    pub fusion: FusionWeights,
    pub classifier: ClassifierConfig,
    pub cors_allowed_origins: Vec<String>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,
    pub rust_log: String,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Redirect tracer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    pub max_hops: usize,
    pub redirect_timeout_ms: u64,
    pub transport_redirect_limit: usize, // Transport's own cap, independent of max_hops
    pub user_agent: String,
}

impl ScannerConfig {
    pub fn redirect_timeout(&self) -> Duration {
        Duration::from_millis(self.redirect_timeout_ms)
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_hops: 6,
            redirect_timeout_ms: 5000,
            transport_redirect_limit: DEFAULT_TRANSPORT_REDIRECT_LIMIT,
            user_agent: "PhishGuard-Scanner/1.0".to_string(),
        }
    }
}

/// Classifier settings; no model path means heuristic-only scoring
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub model_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "0.0.0.0:5000".to_string(),
                port: 5000,
                environment: Environment::Development,
                rust_log: "info".to_string(),
            },
            scanner: ScannerConfig::default(),
            fusion: DEFAULT_FUSION_WEIGHTS,
            classifier: ClassifierConfig::default(),
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Helper function to get optional env var with default
        let get_or_default = |key: &str, default: &str| -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let parse_usize_or_default = |key: &str, default: &str| -> Result<usize, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid usize".to_string())
            })
        };

        let parse_u64_or_default = |key: &str, default: &str| -> Result<u64, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u64".to_string())
            })
        };

        let parse_weight_or_default = |key: &str, default: f64| -> Result<f64, ConfigError> {
            let weight = match env::var(key) {
                Ok(raw) => raw.parse::<f64>().map_err(|_| {
                    ConfigError::InvalidValue(key.to_string(), "not a valid number".to_string())
                })?,
                Err(_) => default,
            };
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidValue(
                    key.to_string(),
                    "weight must be a finite, non-negative number".to_string(),
                ));
            }
            Ok(weight)
        };

        let defaults = AppConfig::default();

        // Parse bind address to extract port
        let bind_address = get_or_default("BIND_ADDRESS", &defaults.server.bind_address);
        let port = bind_address
            .rsplit(':')
            .next()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.server.port);

        let environment = Environment::from(get_or_default("ENVIRONMENT", "development"));
        let rust_log = get_or_default("RUST_LOG", "info");

        let server = ServerConfig {
            bind_address,
            port,
            environment,
            rust_log,
        };

        let scanner = ScannerConfig {
            max_hops: parse_usize_or_default("REDIRECT_MAX_HOPS", "6")?,
            redirect_timeout_ms: parse_u64_or_default("REDIRECT_TIMEOUT_MS", "5000")?,
            transport_redirect_limit: parse_usize_or_default(
                "REDIRECT_TRANSPORT_LIMIT",
                &DEFAULT_TRANSPORT_REDIRECT_LIMIT.to_string(),
            )?,
            user_agent: get_or_default("SCANNER_USER_AGENT", &defaults.scanner.user_agent),
        };

        if scanner.redirect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "REDIRECT_TIMEOUT_MS".to_string(),
                "timeout must be greater than zero".to_string(),
            ));
        }

        let fusion = FusionWeights {
            heuristic: parse_weight_or_default(
                "FUSION_HEURISTIC_WEIGHT",
                DEFAULT_FUSION_WEIGHTS.heuristic,
            )?,
            model: parse_weight_or_default("FUSION_MODEL_WEIGHT", DEFAULT_FUSION_WEIGHTS.model)?,
        };

        let classifier = ClassifierConfig {
            model_path: env::var("CLASSIFIER_MODEL_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
        };

        let cors_allowed_origins: Vec<String> = get_or_default("CORS_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            server,
            scanner,
            fusion,
            classifier,
            cors_allowed_origins,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.server.environment == Environment::Production
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        self.server.environment == Environment::Development
    }
}
