//! Configuration management for the exporter
//!
//! Configuration is read from a YAML file, then overridden by environment
//! variables and command line flags. See [`loader`] for the lookup order.

pub mod loader;
pub mod models;

pub use loader::{Overrides, expand_env_vars};
pub use models::*;

use crate::core::collector::{Aggregation, CollectorConfig};
use crate::utils::error::{ExporterError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Supported configuration layout
pub const CONFIG_VERSION: &str = "3.0";

/// Main configuration struct for the exporter
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, deserialize_with = "loader::deserialize_version")]
    pub version: Option<String>,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
    #[serde(default)]
    pub aggregations: Vec<Aggregation>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: Some(CONFIG_VERSION.to_string()),
            bind: default_bind(),
            metrics_path: default_metrics_path(),
            log: LogConfig::default(),
            global: GlobalConfig::default(),
            servers: Vec::new(),
            aggregations: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ExporterError::config(format!("failed to read config file {:?}: {}", path, e))
        })?;

        let config = Self::from_yaml(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse configuration from a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Collector settings derived from the global section
    pub fn collector_config(&self) -> CollectorConfig {
        self.global.collector_config()
    }

    /// Socket address for the HTTP server; an empty host listens on all interfaces
    pub fn bind_address(&self) -> String {
        if self.bind.starts_with(':') {
            format!("0.0.0.0{}", self.bind)
        } else {
            self.bind.clone()
        }
    }

    /// Add the default server when none is configured
    pub fn ensure_server(&mut self) {
        if self.servers.is_empty() {
            debug!("no server configured, using {}", default_uri());
            self.servers.push(ServerConfig::default());
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        if let Some(version) = &self.version {
            if !version.starts_with('3') {
                return Err(ExporterError::config(format!(
                    "unsupported config version {}, expected {}",
                    version, CONFIG_VERSION
                )));
            }
        }

        if !self.metrics_path.starts_with('/') {
            return Err(ExporterError::config(format!(
                "metrics path {:?} must start with /",
                self.metrics_path
            )));
        }

        if self.metrics_path == HEALTHZ_PATH {
            return Err(ExporterError::config(format!(
                "metrics path {} is reserved for health checks",
                HEALTHZ_PATH
            )));
        }

        if self.global.query_timeout.is_zero() {
            return Err(ExporterError::config("query timeout must be greater than 0"));
        }

        for (index, server) in self.servers.iter().enumerate() {
            if server.uri.is_empty() {
                return Err(ExporterError::config(format!(
                    "server {} has no uri",
                    index
                )));
            }
        }

        debug!("Configuration validation completed");
        Ok(())
    }
}
