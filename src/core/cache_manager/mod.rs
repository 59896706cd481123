//! Scrape result cache
//!
//! Results are cached per (aggregation, server) pair. An entry either expires
//! at an absolute instant or is sticky and lives until it is evicted
//! explicitly, which is what push-mode aggregations rely on.

pub mod manager;
pub mod types;


pub use manager::ResultCache;
pub use types::{CacheEntry, CacheKey, Expiry};
