//! Monitoring of the exporter itself

pub mod metrics;

pub use metrics::{Exposition, QUERY_COUNTER_NAME, encode_text, query_counter, scrape};
