//! Collection engine
//!
//! A [`Collector`] holds the registered servers and aggregations. Each scrape
//! runs every aggregation against every server it is bound to, unless a fresh
//! result is cached, and converts the result documents into gauge samples.
//!
//! ```text
//! collect()
//!   ├── cache hit  -> cached samples
//!   └── cache miss -> Execution (tokio task, bounded by query_timeout)
//!                       ├── driver.aggregate()
//!                       ├── synthesize() per document and metric
//!                       └── cache store + query counter
//! ```
//!
//! Push-mode aggregations keep their results cached until a change stream
//! started by [`Collector::start_cache_invalidator`] reports a change.

mod execution;
mod pipeline;
mod registry;
mod scrape;
pub mod synthesis;
mod types;
mod watcher;


pub use execution::QueryResult;
pub use pipeline::parse_pipeline;
pub use registry::{Server, ServerRegistry};
pub use scrape::Collector;
pub use types::{
    Aggregation, AggregationId, CachePolicy, CollectorConfig, DEFAULT_QUERY_TIMEOUT,
    MetricDescriptor, MetricKind, MetricTemplate, Mode, SERVER_LABEL, Sample,
};
