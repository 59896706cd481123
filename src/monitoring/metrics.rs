//! Exporter self-metrics and text exposition

use crate::core::collector::{Collector, QueryResult};
use crate::utils::error::Result;
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, IntCounterVec, Opts, TextEncoder};

/// Name of the counter tracking executed aggregations
pub const QUERY_COUNTER_NAME: &str = "mongodb_query_exporter_query_total";

pub const QUERY_COUNTER_HELP: &str =
    "How many MongoDB queries have been processed, partitioned by metric, server and status";

/// Labels of the query counter, in order
pub const QUERY_COUNTER_LABELS: [&str; 3] = ["aggregation", "server", "result"];

/// Counter of executed aggregations, partitioned by aggregation, server and result
pub fn query_counter() -> Result<IntCounterVec> {
    query_counter_named(QUERY_COUNTER_NAME)
}

/// Same as [`query_counter`] under a different metric name
pub fn query_counter_named(name: &str) -> Result<IntCounterVec> {
    let counter = IntCounterVec::new(Opts::new(name, QUERY_COUNTER_HELP), &QUERY_COUNTER_LABELS)?;
    Ok(counter)
}

/// Current value of the counter for one aggregation, server and result
pub fn query_count(
    counter: &IntCounterVec,
    aggregation: &str,
    server: &str,
    result: QueryResult,
) -> u64 {
    counter
        .with_label_values(&[aggregation, server, result.as_str()])
        .get()
}

/// Encoded scrape body and its content type
#[derive(Debug, Clone)]
pub struct Exposition {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Encode metric families in the prometheus text format
pub fn encode_text(families: &[MetricFamily]) -> Result<Exposition> {
    let encoder = TextEncoder::new();
    let mut body = Vec::new();
    encoder.encode(families, &mut body)?;

    Ok(Exposition {
        body,
        content_type: encoder.format_type().to_string(),
    })
}

/// Collect from `collector` and encode the result
pub async fn scrape(collector: &Collector) -> Result<Exposition> {
    let families = collector.collect().await;
    encode_text(&families)
}
