//! Collector type definitions

use crate::utils::error::{ExporterError, Result};
use bson::Document;
use prometheus::core::Desc;
use prometheus::proto::{self, LabelPair};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Label carrying the server name on every sample
pub const SERVER_LABEL: &str = "server";

/// Default upper bound of a single aggregation execution
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Identity of a registered aggregation, assigned in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AggregationId(usize);

impl AggregationId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for AggregationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aggregation_{}", self.0)
    }
}

/// How the freshness of cached results is maintained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Results are recomputed whenever the cache policy says so
    #[default]
    Pull,
    /// Results are cached until a change stream reports a change
    Push,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pull => f.write_str("pull"),
            Self::Push => f.write_str("push"),
        }
    }
}

/// How long results of an aggregation are served from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    Disabled,
    Ttl(Duration),
    /// Cached until explicitly evicted
    Sticky,
}

impl CachePolicy {
    /// A zero TTL disables caching
    pub fn ttl(ttl: Duration) -> Self {
        if ttl.is_zero() {
            Self::Disabled
        } else {
            Self::Ttl(ttl)
        }
    }
}

impl FromStr for CachePolicy {
    type Err = ExporterError;

    /// Accepts `sticky` or `-1`, `0`, or a humantime duration such as `60s`
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "sticky" | "-1" => Ok(Self::Sticky),
            "" | "0" => Ok(Self::Disabled),
            text => humantime::parse_duration(text)
                .map(Self::ttl)
                .map_err(|e| ExporterError::config(format!("invalid cache {:?}: {}", text, e))),
        }
    }
}

impl<'de> Deserialize<'de> for CachePolicy {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Seconds(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Seconds(-1) => Ok(Self::Sticky),
            Raw::Seconds(secs) if secs >= 0 => Ok(Self::ttl(Duration::from_secs(secs as u64))),
            Raw::Seconds(secs) => Err(serde::de::Error::custom(format!(
                "invalid cache {}, expected -1 or a positive number of seconds",
                secs
            ))),
            Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Metric kinds the collector can export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
}

impl MetricKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "gauge" => Some(Self::Gauge),
            _ => None,
        }
    }

    pub fn proto_type(&self) -> proto::MetricType {
        match self {
            Self::Gauge => proto::MetricType::GAUGE,
        }
    }
}

/// Describes how result documents turn into samples of one metric
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricTemplate {
    pub name: String,
    #[serde(rename = "type")]
    pub metric_type: String,
    pub help: String,
    /// Result field holding the sample value
    pub value: String,
    /// Result fields copied into labels, in order
    pub labels: Vec<String>,
    pub const_labels: HashMap<String, String>,
    /// Emit `empty_value` when the aggregation returns no documents
    pub override_empty: bool,
    pub empty_value: f64,
}

/// An aggregation pipeline to execute and the metrics to derive from it
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Aggregation {
    /// Servers to run against; empty means every registered server
    pub servers: Vec<String>,
    pub cache: Option<CachePolicy>,
    pub mode: Option<Mode>,
    /// Empty falls back to the collector default
    pub database: String,
    /// Empty falls back to the collector default
    pub collection: String,
    /// Relaxed extended JSON array of pipeline stages
    pub pipeline: String,
    pub metrics: Vec<MetricTemplate>,
}

/// Collector-wide settings and aggregation defaults
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorConfig {
    pub query_timeout: Duration,
    pub default_cache: Option<CachePolicy>,
    pub default_mode: Option<Mode>,
    pub default_database: String,
    pub default_collection: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            default_cache: None,
            default_mode: None,
            default_database: String::new(),
            default_collection: String::new(),
        }
    }
}

/// Immutable descriptor of one metric, built at registration
#[derive(Debug)]
pub struct MetricDescriptor {
    pub template: MetricTemplate,
    pub kind: MetricKind,
    desc: Desc,
}

impl MetricDescriptor {
    /// Validate the template and build its prometheus descriptor
    pub fn new(template: MetricTemplate) -> Result<Self> {
        let kind = MetricKind::parse(&template.metric_type).ok_or_else(|| {
            ExporterError::UnsupportedMetricType {
                metric: template.name.clone(),
                kind: template.metric_type.clone(),
            }
        })?;

        let mut variable_labels = Vec::with_capacity(template.labels.len() + 1);
        variable_labels.push(SERVER_LABEL.to_string());
        variable_labels.extend(template.labels.iter().cloned());

        // prometheus rejects an empty help text
        let help = if template.help.is_empty() {
            template.name.clone()
        } else {
            template.help.clone()
        };

        let desc = Desc::new(
            template.name.clone(),
            help,
            variable_labels,
            template.const_labels.clone(),
        )
        .map_err(|source| ExporterError::InvalidDescriptor {
            metric: template.name.clone(),
            source,
        })?;

        Ok(Self {
            template,
            kind,
            desc,
        })
    }

    pub fn desc(&self) -> &Desc {
        &self.desc
    }

    pub fn name(&self) -> &str {
        &self.desc.fq_name
    }

    pub fn help(&self) -> &str {
        &self.desc.help
    }

    /// Whether samples of both descriptors can share one metric family
    pub(crate) fn is_compatible(&self, other: &MetricDescriptor) -> bool {
        let const_names = |desc: &Desc| -> Vec<String> {
            desc.const_label_pairs
                .iter()
                .map(|pair| pair.name().to_string())
                .collect()
        };

        self.kind == other.kind
            && self.desc.help == other.desc.help
            && self.desc.variable_labels == other.desc.variable_labels
            && const_names(&self.desc) == const_names(&other.desc)
    }
}

/// One value of one metric, ready to be encoded
#[derive(Debug, Clone)]
pub struct Sample {
    pub metric: Arc<MetricDescriptor>,
    pub value: f64,
    /// Values for the variable labels, server name first
    pub label_values: Vec<String>,
}

impl Sample {
    /// Convert into a protobuf metric with label pairs sorted by name
    pub fn to_proto(&self) -> proto::Metric {
        let desc = self.metric.desc();
        let mut labels: Vec<LabelPair> =
            Vec::with_capacity(desc.const_label_pairs.len() + self.label_values.len());
        labels.extend(desc.const_label_pairs.iter().cloned());

        for (name, value) in desc.variable_labels.iter().zip(&self.label_values) {
            let mut pair = LabelPair::default();
            pair.set_name(name.clone());
            pair.set_value(value.clone());
            labels.push(pair);
        }
        labels.sort_by(|a, b| a.name().cmp(b.name()));

        let mut metric = proto::Metric::default();
        metric.set_label(labels);
        match self.metric.kind {
            MetricKind::Gauge => {
                let mut gauge = proto::Gauge::default();
                gauge.set_value(self.value);
                metric.set_gauge(gauge);
            }
        }
        metric
    }
}

/// An aggregation after validation, with defaults applied
#[derive(Debug)]
pub(crate) struct RegisteredAggregation {
    pub id: AggregationId,
    pub servers: Vec<String>,
    pub cache: Option<CachePolicy>,
    pub mode: Mode,
    pub database: String,
    pub collection: String,
    pub pipeline: Vec<Document>,
    pub metrics: Vec<Arc<MetricDescriptor>>,
}
