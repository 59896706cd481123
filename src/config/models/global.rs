//! Settings shared by every aggregation

use super::*;
use crate::core::collector::{CachePolicy, CollectorConfig, Mode};
use serde::Deserialize;
use std::time::Duration;

/// Global collector settings and aggregation defaults
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    #[serde(default = "default_query_timeout", with = "humantime_serde")]
    pub query_timeout: Duration,
    /// Connection pool size per server
    #[serde(default)]
    pub max_connections: Option<u32>,
    #[serde(default)]
    pub default_cache: Option<CachePolicy>,
    #[serde(default)]
    pub default_mode: Option<Mode>,
    #[serde(default)]
    pub default_database: String,
    #[serde(default)]
    pub default_collection: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            query_timeout: default_query_timeout(),
            max_connections: None,
            default_cache: None,
            default_mode: None,
            default_database: String::new(),
            default_collection: String::new(),
        }
    }
}

impl GlobalConfig {
    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            query_timeout: self.query_timeout,
            default_cache: self.default_cache,
            default_mode: self.default_mode,
            default_database: self.default_database.clone(),
            default_collection: self.default_collection.clone(),
        }
    }
}
