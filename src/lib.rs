//! # mongodb-query-exporter
//!
//! Runs MongoDB aggregation pipelines and exposes their results as Prometheus
//! gauges.
//!
//! ## Features
//!
//! - **Multi-Server**: Every aggregation can run against any subset of the configured servers
//! - **Result Caching**: Per aggregation and server, with a TTL or until a change event arrives
//! - **Push Mode**: Change streams invalidate cached results as soon as the collection changes
//! - **Concurrent Scrapes**: Stale aggregations run in parallel, each bounded by a timeout
//! - **Self Monitoring**: Every execution is counted by result
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mongodb_query_exporter::{Config, config::Overrides, server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(&Overrides::default()).await?;
//!     server::run_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Embedding the collector
//!
//! ```rust,no_run
//! use mongodb_query_exporter::core::collector::{Aggregation, Collector, CollectorConfig};
//! use mongodb_query_exporter::core::driver::MongoDbDriver;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let driver = MongoDbDriver::connect("mongodb://localhost:27017", None).await?;
//!     let mut collector = Collector::new(CollectorConfig::default());
//!     collector.register_server("main", Arc::new(driver))?;
//!     collector.register_aggregation(Aggregation {
//!         collection: "events".to_string(),
//!         pipeline: r#"[{"$count":"total"}]"#.to_string(),
//!         ..Default::default()
//!     })?;
//!
//!     let families = collector.collect().await;
//!     println!("{} metric families", families.len());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod cli;
pub mod config;
pub mod core;
pub mod monitoring;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::collector::Collector;
pub use utils::error::{ExporterError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Exporter build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build information recorded by the build script
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
