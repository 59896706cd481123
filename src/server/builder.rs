//! Wiring configuration, database connections and the HTTP server together

use crate::config::Config;
use crate::core::collector::Collector;
use crate::core::driver::{Driver, MongoDbDriver};
use crate::monitoring::query_counter;
use crate::server::server::HttpServer;
use crate::utils::error::{ExporterError, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Build a collector from the configuration, connecting to every server.
///
/// Connection failures are fatal; an unanswered ping is only logged since the
/// server may come up later.
pub async fn build_collector(config: &Config) -> Result<Collector> {
    let mut collector = Collector::new(config.collector_config()).with_counter(query_counter()?);

    for server in &config.servers {
        let driver = MongoDbDriver::connect(&server.uri, config.global.max_connections)
            .await
            .map_err(|e| ExporterError::config(format!("failed to connect to mongodb: {}", e)))?;
        let name = server.resolved_name(driver.hosts());

        if let Err(e) = driver.ping().await {
            warn!(server = %name, error = %e, "mongodb server is not reachable");
        }

        collector.register_server(name, Arc::new(driver))?;
    }

    register_aggregations(&mut collector, config)?;
    Ok(collector)
}

/// Register every configured aggregation
pub fn register_aggregations(collector: &mut Collector, config: &Config) -> Result<()> {
    if config.aggregations.is_empty() {
        warn!("no aggregations have been configured");
    }

    for aggregation in &config.aggregations {
        collector.register_aggregation(aggregation.clone())?;
    }
    Ok(())
}

/// Run the exporter until the HTTP server stops
pub async fn run_server(config: Config) -> Result<()> {
    info!(
        version = crate::VERSION,
        git_hash = crate::build_info().git_hash,
        "starting {}",
        crate::NAME
    );

    let collector = build_collector(&config).await?;
    let watchers = collector.start_cache_invalidator();
    info!(
        servers = config.servers.len(),
        aggregations = collector.aggregation_count(),
        watchers = watchers.len(),
        "collector ready"
    );

    let result = HttpServer::new(config, collector).start().await;

    for watcher in watchers {
        watcher.abort();
    }
    result
}
