//! Executing one aggregation against one server

use super::registry::Server;
use super::synthesis::{empty_sample, synthesize};
use super::types::{CachePolicy, Mode, RegisteredAggregation, Sample};
use crate::core::cache_manager::{CacheKey, Expiry, ResultCache};
use crate::utils::error::{ExporterError, MultiError, Result};
use futures::StreamExt;
use prometheus::IntCounterVec;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Shared cache of scrape results
pub(crate) type SampleCache = ResultCache<Arc<[Sample]>>;

/// Outcome label on the query counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryResult {
    Success,
    Error,
}

impl QueryResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
        }
    }
}

/// Expiry to store results with, `None` if they must not be cached
pub(crate) fn cache_expiry(policy: Option<CachePolicy>, mode: Mode) -> Option<Expiry> {
    match (policy, mode) {
        (Some(CachePolicy::Sticky), _) => Some(Expiry::Sticky),
        (None | Some(CachePolicy::Disabled), Mode::Push) => Some(Expiry::Sticky),
        (Some(CachePolicy::Ttl(ttl)), _) => Some(Expiry::after(ttl)),
        (None | Some(CachePolicy::Disabled), Mode::Pull) => None,
    }
}

/// A cache miss to be resolved by running the aggregation
pub(crate) struct Execution {
    pub aggregation: Arc<RegisteredAggregation>,
    pub server: Arc<Server>,
    pub cache: Arc<SampleCache>,
    pub counter: Option<IntCounterVec>,
    pub query_timeout: Duration,
}

impl Execution {
    /// Run the aggregation, cache and return its samples
    pub async fn run(self) -> Vec<Sample> {
        let id = self.aggregation.id;
        let server = self.server.name().to_string();
        debug!(aggregation = %id, server = %server, "executing aggregation");

        let outcome = tokio::time::timeout(self.query_timeout, self.fetch()).await;
        let (samples, result) = match outcome {
            Err(_) => {
                let err = ExporterError::Timeout(self.query_timeout);
                warn!(aggregation = %id, server = %server, error = %err, "aggregation failed");
                (Vec::new(), QueryResult::Error)
            }
            Ok(Err(err)) => {
                warn!(aggregation = %id, server = %server, error = %err, "aggregation failed");
                (Vec::new(), QueryResult::Error)
            }
            Ok(Ok((samples, errors))) => {
                self.store(&samples);
                let skipped = errors.errors().iter().filter(|err| err.is_synthesis()).count();
                if skipped > 0 {
                    debug!(
                        aggregation = %id,
                        server = %server,
                        skipped,
                        "results without a usable value or label"
                    );
                }
                match errors.into_result() {
                    Ok(()) => (samples, QueryResult::Success),
                    Err(err) => {
                        warn!(
                            aggregation = %id,
                            server = %server,
                            error = %err,
                            "aggregation completed with errors"
                        );
                        (samples, QueryResult::Error)
                    }
                }
            }
        };

        if let Some(counter) = &self.counter {
            counter
                .with_label_values(&[id.to_string().as_str(), server.as_str(), result.as_str()])
                .inc();
        }

        samples
    }

    /// Samples of every document plus the errors hit along the way.
    ///
    /// Only a failure to start the aggregation is returned as `Err`.
    async fn fetch(&self) -> Result<(Vec<Sample>, MultiError)> {
        let aggregation = &self.aggregation;
        let server = self.server.name();

        let mut cursor = self
            .server
            .driver()
            .aggregate(
                &aggregation.database,
                &aggregation.collection,
                aggregation.pipeline.clone(),
            )
            .await?;

        let mut samples = Vec::new();
        let mut errors = MultiError::new();
        let mut received = 0usize;

        while let Some(item) = cursor.next().await {
            received += 1;
            let document = match item {
                Ok(document) => document,
                Err(err) if err.is_decode() => {
                    errors.push(err.into());
                    continue;
                }
                Err(err) => {
                    errors.push(err.into());
                    break;
                }
            };

            for metric in &aggregation.metrics {
                match synthesize(&document, server, metric) {
                    Ok(sample) => samples.push(sample),
                    Err(err) => errors.push(err),
                }
            }
        }

        if received == 0 {
            debug!(
                aggregation = %aggregation.id,
                server = %server,
                "aggregation returned no documents"
            );
            samples.extend(
                aggregation
                    .metrics
                    .iter()
                    .filter(|metric| metric.template.override_empty)
                    .map(|metric| empty_sample(server, metric)),
            );
        }

        Ok((samples, errors))
    }

    fn store(&self, samples: &[Sample]) {
        if let Some(expiry) = cache_expiry(self.aggregation.cache, self.aggregation.mode) {
            let key = CacheKey::new(self.aggregation.id, self.server.shared_name());
            self.cache.store(key, Arc::from(samples), expiry);
        }
    }
}
