//! Scrape orchestration

use super::execution::{Execution, SampleCache};
use super::pipeline::parse_pipeline;
use super::registry::ServerRegistry;
use super::types::{
    Aggregation, AggregationId, CollectorConfig, MetricDescriptor, MetricKind, Mode,
    RegisteredAggregation, Sample,
};
use super::watcher::CacheInvalidator;
use crate::core::cache_manager::CacheKey;
use crate::core::driver::Driver;
use crate::utils::error::{ExporterError, Result};
use parking_lot::Mutex;
use prometheus::IntCounterVec;
use prometheus::core::{Collector as _, Desc};
use prometheus::proto::MetricFamily;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info};

/// Registry of servers and aggregations that produces metrics on demand
pub struct Collector {
    config: CollectorConfig,
    servers: ServerRegistry,
    aggregations: Vec<Arc<RegisteredAggregation>>,
    cache: Arc<SampleCache>,
    counter: Option<IntCounterVec>,
    watchers: Mutex<HashSet<CacheKey>>,
}

impl Collector {
    pub fn new(config: CollectorConfig) -> Self {
        Self {
            config,
            servers: ServerRegistry::new(),
            aggregations: Vec::new(),
            cache: Arc::new(SampleCache::new()),
            counter: None,
            watchers: Mutex::new(HashSet::new()),
        }
    }

    /// Count every executed aggregation in `counter`.
    ///
    /// The counter must take the labels `aggregation`, `server` and `result`.
    pub fn with_counter(mut self, counter: IntCounterVec) -> Self {
        self.counter = Some(counter);
        self
    }

    pub fn register_server(
        &mut self,
        name: impl Into<String>,
        driver: Arc<dyn Driver>,
    ) -> Result<()> {
        let name = name.into();
        self.servers.register(name.clone(), driver)?;
        info!(server = %name, "server registered");
        Ok(())
    }

    /// Validate an aggregation and add it to the collector
    pub fn register_aggregation(&mut self, aggregation: Aggregation) -> Result<AggregationId> {
        if !aggregation.servers.is_empty()
            && self.servers.resolve(&aggregation.servers).len() != aggregation.servers.len()
        {
            return Err(ExporterError::UnknownServer(aggregation.servers));
        }

        // Checked up front so a template without a type is reported as such
        if let Some(template) = aggregation
            .metrics
            .iter()
            .find(|template| MetricKind::parse(&template.metric_type).is_none())
        {
            return Err(ExporterError::UnsupportedMetricType {
                metric: template.name.clone(),
                kind: template.metric_type.clone(),
            });
        }

        let pipeline = parse_pipeline(&aggregation.pipeline)?;

        let metrics = aggregation
            .metrics
            .into_iter()
            .map(|template| MetricDescriptor::new(template).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        self.check_conflicts(&metrics)?;

        let id = AggregationId::new(self.aggregations.len());
        let registered = RegisteredAggregation {
            id,
            servers: aggregation.servers,
            cache: aggregation.cache.or(self.config.default_cache),
            mode: aggregation.mode.or(self.config.default_mode).unwrap_or_default(),
            database: or_default(aggregation.database, &self.config.default_database),
            collection: or_default(aggregation.collection, &self.config.default_collection),
            pipeline,
            metrics,
        };

        debug!(
            aggregation = %id,
            database = %registered.database,
            collection = %registered.collection,
            mode = %registered.mode,
            cache = ?registered.cache,
            metrics = registered.metrics.len(),
            "aggregation registered"
        );

        self.aggregations.push(Arc::new(registered));
        Ok(id)
    }

    /// Metrics sharing a name must agree on kind, help and label names
    fn check_conflicts(&self, metrics: &[Arc<MetricDescriptor>]) -> Result<()> {
        let registered = self
            .aggregations
            .iter()
            .flat_map(|aggregation| aggregation.metrics.iter());

        for (index, metric) in metrics.iter().enumerate() {
            let conflict = registered
                .clone()
                .chain(&metrics[..index])
                .find(|other| other.name() == metric.name() && !other.is_compatible(metric));

            if conflict.is_some() {
                return Err(ExporterError::InvalidDescriptor {
                    metric: metric.name().to_string(),
                    source: prometheus::Error::Msg(format!(
                        "metric {} is already registered with a different help text or label names",
                        metric.name()
                    )),
                });
            }
        }
        Ok(())
    }

    pub fn aggregation_count(&self) -> usize {
        self.aggregations.len()
    }

    /// Whether a fresh result of the aggregation on `server` is cached
    pub fn is_cached(&self, aggregation: AggregationId, server: &str) -> bool {
        self.cache.get(&CacheKey::new(aggregation, server)).is_some()
    }

    /// Descriptors of every metric, including the query counter
    pub fn describe(&self) -> Vec<&Desc> {
        let mut descs: Vec<&Desc> = self
            .aggregations
            .iter()
            .flat_map(|aggregation| aggregation.metrics.iter().map(|metric| metric.desc()))
            .collect();

        if let Some(counter) = &self.counter {
            descs.extend(counter.desc());
        }
        descs
    }

    /// Serve cached results and run every stale aggregation concurrently.
    ///
    /// Returns once every execution has finished, one family per metric name
    /// sorted by name.
    pub async fn collect(&self) -> Vec<MetricFamily> {
        let mut samples: Vec<Sample> = Vec::new();
        let mut tasks = JoinSet::new();

        for aggregation in &self.aggregations {
            for server in self.servers.resolve(&aggregation.servers) {
                let key = CacheKey::new(aggregation.id, server.shared_name());
                if let Some(cached) = self.cache.get(&key) {
                    samples.extend(cached.iter().cloned());
                    continue;
                }

                let execution = Execution {
                    aggregation: Arc::clone(aggregation),
                    server,
                    cache: Arc::clone(&self.cache),
                    counter: self.counter.clone(),
                    query_timeout: self.config.query_timeout,
                };
                tasks.spawn(execution.run());
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(executed) => samples.extend(executed),
                Err(err) => error!(error = %err, "aggregation task failed"),
            }
        }

        let mut families = into_families(samples);
        if let Some(counter) = &self.counter {
            families.extend(counter.collect().into_iter().filter(has_metrics));
        }
        families.sort_by(|a, b| a.name().cmp(b.name()));
        families
    }

    /// Start one change stream watcher per push-mode aggregation and server.
    ///
    /// Calling this again does not start a second watcher for the same pair.
    pub fn start_cache_invalidator(&self) -> Vec<JoinHandle<()>> {
        let mut started = self.watchers.lock();
        let mut handles = Vec::new();

        for aggregation in self.aggregations.iter().filter(|a| a.mode == Mode::Push) {
            for server in self.servers.resolve(&aggregation.servers) {
                let key = CacheKey::new(aggregation.id, server.shared_name());
                if !started.insert(key.clone()) {
                    continue;
                }

                let invalidator = CacheInvalidator {
                    key,
                    driver: Arc::clone(server.driver()),
                    database: aggregation.database.clone(),
                    collection: aggregation.collection.clone(),
                    cache: Arc::clone(&self.cache),
                };
                handles.push(tokio::spawn(invalidator.run()));
            }
        }

        handles
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

#[allow(deprecated)]
fn has_metrics(family: &MetricFamily) -> bool {
    !family.get_metric().is_empty()
}

/// Group samples into one family per metric name.
///
/// Descriptors of one name are compatible (see `check_conflicts`), but equal
/// label values from different documents or aggregations still produce
/// duplicate series in the family.
fn into_families(samples: Vec<Sample>) -> Vec<MetricFamily> {
    let mut families: BTreeMap<String, MetricFamily> = BTreeMap::new();

    for sample in samples {
        let family = families
            .entry(sample.metric.name().to_string())
            .or_insert_with(|| {
                let mut family = MetricFamily::default();
                family.set_name(sample.metric.name().to_string());
                family.set_help(sample.metric.help().to_string());
                family.set_field_type(sample.metric.kind.proto_type());
                family
            });
        family.mut_metric().push(sample.to_proto());
    }

    families.into_values().collect()
}
