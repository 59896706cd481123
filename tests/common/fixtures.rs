//! Test fixtures and data factories

use mongodb_query_exporter::core::collector::{Aggregation, MetricTemplate};

/// Factory for metric templates
pub struct MetricFactory;

impl MetricFactory {
    /// Gauge reading `total`
    pub fn gauge(name: &str) -> MetricTemplate {
        MetricTemplate {
            name: name.to_string(),
            metric_type: "gauge".to_string(),
            help: format!("{} from an aggregation", name),
            value: "total".to_string(),
            ..Default::default()
        }
    }

    /// Gauge reading `total` labeled by the given result fields
    pub fn labeled(name: &str, labels: &[&str]) -> MetricTemplate {
        MetricTemplate {
            labels: labels.iter().map(|label| label.to_string()).collect(),
            ..Self::gauge(name)
        }
    }
}

/// Factory for aggregations
pub struct AggregationFactory;

impl AggregationFactory {
    /// Aggregation on `app.events` exporting `metrics`
    pub fn create(metrics: Vec<MetricTemplate>) -> Aggregation {
        Aggregation {
            database: "app".to_string(),
            collection: "events".to_string(),
            pipeline: r#"[{"$group":{"_id":"$kind","total":{"$sum":1}}}]"#.to_string(),
            metrics,
            ..Default::default()
        }
    }

    /// Aggregation restricted to `servers`
    pub fn on(servers: &[&str], metrics: Vec<MetricTemplate>) -> Aggregation {
        Aggregation {
            servers: servers.iter().map(|server| server.to_string()).collect(),
            ..Self::create(metrics)
        }
    }
}

/// Configuration file exercising every section
pub const FULL_CONFIG: &str = r#"
version: 3.0
bind: ":9412"
metricsPath: /metrics
log:
  encoding: json
  level: info
global:
  queryTimeout: 10s
  defaultCache: 5s
  defaultDatabase: app
servers:
  - name: main
    uri: mongodb://localhost:27017
  - name: replica
    uri: mongodb://${REPLICA_HOST}:27017
aggregations:
  - collection: events
    servers: [main]
    pipeline: |
      [
        {"$match": {"createdAt": {"$gt": {"$date": "2024-01-01T00:00:00Z"}}}},
        {"$group": {"_id": "$kind", "total": {"$sum": 1}}},
        {"$project": {"_id": 0, "kind": "$_id", "total": 1}}
      ]
    metrics:
      - name: app_events_total
        type: gauge
        help: Events by kind
        value: total
        labels: [kind]
        constLabels:
          team: platform
  - collection: queue
    mode: push
    cache: -1
    pipeline: '[{"$count": "total"}]'
    metrics:
      - name: app_queue_size
        type: gauge
        value: total
        overrideEmpty: true
        emptyValue: 0
"#;
