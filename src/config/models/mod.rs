//! Configuration data models

pub mod global;
pub mod log;
pub mod server;

pub use global::GlobalConfig;
pub use log::{LogConfig, LogEncoding};
pub use server::ServerConfig;

use std::time::Duration;

/// Default HTTP listen address
pub fn default_bind() -> String {
    ":9412".to_string()
}

pub fn default_metrics_path() -> String {
    "/metrics".to_string()
}

/// Path answering liveness probes, not configurable
pub const HEALTHZ_PATH: &str = "/healthz";

pub fn default_query_timeout() -> Duration {
    crate::core::collector::DEFAULT_QUERY_TIMEOUT
}

pub fn default_server_name() -> String {
    "main".to_string()
}

pub fn default_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

pub fn default_log_level() -> String {
    "warn".to_string()
}
