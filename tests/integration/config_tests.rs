//! Configuration files feeding a collector

use crate::common::ScriptedDriver;
use crate::common::fixtures::FULL_CONFIG;
use bson::doc;
use mongodb_query_exporter::config::{Config, LogEncoding, Overrides};
use mongodb_query_exporter::core::collector::{CachePolicy, Collector, Mode};
use mongodb_query_exporter::server::builder::register_aggregations;
use mongodb_query_exporter::utils::error::ExporterError;
use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_full_config() {
    let mut config = Config::from_yaml(FULL_CONFIG).unwrap();
    let env: HashMap<&str, &str> = HashMap::from([("REPLICA_HOST", "replica.internal")]);
    config.apply_env(|name| env.get(name).map(|value| value.to_string()));
    config.validate().unwrap();

    assert_eq!(config.bind_address(), "0.0.0.0:9412");
    assert_eq!(config.log.encoding, LogEncoding::Json);
    assert_eq!(config.servers[1].uri, "mongodb://replica.internal:27017");

    let collector_config = config.collector_config();
    assert_eq!(collector_config.query_timeout, Duration::from_secs(10));
    assert_eq!(
        collector_config.default_cache,
        Some(CachePolicy::Ttl(Duration::from_secs(5)))
    );
    assert_eq!(collector_config.default_database, "app");

    assert_eq!(config.aggregations[1].mode, Some(Mode::Push));
    assert_eq!(config.aggregations[1].cache, Some(CachePolicy::Sticky));
}

#[tokio::test]
async fn test_configured_aggregations_export() {
    let config = Config::from_yaml(FULL_CONFIG).unwrap();

    let main = ScriptedDriver::new(vec![doc! { "kind": "click", "total": 3 }]);
    let replica = ScriptedDriver::new(vec![]);
    let mut collector = Collector::new(config.collector_config());
    collector.register_server("main", main.clone()).unwrap();
    collector.register_server("replica", replica.clone()).unwrap();
    register_aggregations(&mut collector, &config).unwrap();

    let families = collector.collect().await;
    let body = mongodb_query_exporter::monitoring::encode_text(&families).unwrap().body;
    let text = String::from_utf8(body).unwrap();

    assert!(text.contains(r#"app_events_total{kind="click",server="main",team="platform"} 3"#));
    assert!(text.contains(r#"app_queue_size{server="main"} 3"#));
    // replica returns no documents
    assert!(text.contains(r#"app_queue_size{server="replica"} 0"#));
    assert!(text.contains("# HELP app_queue_size app_queue_size"));
    assert_eq!(main.aggregate_calls(), 2);
    assert_eq!(replica.aggregate_calls(), 1);
}

#[test]
fn test_aggregation_on_unknown_server_is_rejected() {
    let config = Config::from_yaml(FULL_CONFIG).unwrap();
    let mut collector = Collector::new(config.collector_config());
    collector
        .register_server("replica", ScriptedDriver::new(vec![]))
        .unwrap();

    let err = register_aggregations(&mut collector, &config).unwrap_err();
    assert!(matches!(err, ExporterError::UnknownServer(servers) if servers == vec!["main"]));
}

#[tokio::test]
async fn test_load_applies_overrides_last() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(FULL_CONFIG.as_bytes()).unwrap();

    let config = Config::load(&Overrides {
        file: Some(file.path().to_path_buf()),
        uri: Some("mongodb://cli:27017".to_string()),
        log_encoding: Some(LogEncoding::Console),
        query_timeout: Some(Duration::from_secs(2)),
        ..Default::default()
    })
    .await
    .unwrap();

    assert_eq!(config.servers[0].uri, "mongodb://cli:27017");
    assert_eq!(config.servers[0].name, "main");
    assert_eq!(config.log.encoding, LogEncoding::Console);
    assert_eq!(config.global.query_timeout, Duration::from_secs(2));
    assert_eq!(config.aggregations.len(), 2);
}

#[tokio::test]
async fn test_load_rejects_invalid_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"metricsPath: metrics\n").unwrap();

    let result = Config::load(&Overrides {
        file: Some(file.path().to_path_buf()),
        ..Default::default()
    })
    .await;
    assert!(matches!(result, Err(ExporterError::Config(_))));
}
