// Application state shared across handlers
use std::sync::Arc;

use crate::{app_config::AppConfig, services::ScanService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub scan_service: Arc<ScanService>,
}

impl AppState {
    pub fn new(config: AppConfig, scan_service: ScanService) -> Self {
        Self {
            config: Arc::new(config),
            scan_service: Arc::new(scan_service),
        }
    }
}
