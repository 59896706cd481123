//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::collector::Collector;
use std::sync::Arc;

/// HTTP server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Exporter configuration (shared read-only)
    pub config: Arc<Config>,
    /// Collection engine answering scrapes
    pub collector: Arc<Collector>,
}

impl AppState {
    pub fn new(config: Config, collector: Collector) -> Self {
        Self {
            config: Arc::new(config),
            collector: Arc::new(collector),
        }
    }

    pub fn metrics_path(&self) -> &str {
        &self.config.metrics_path
    }
}
