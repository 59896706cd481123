//! Cache manager type definitions

use crate::core::collector::AggregationId;
use std::fmt;
use std::sync::Arc;
use tokio::time::{Duration, Instant};

/// Identifies the result of one aggregation executed against one server
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub aggregation: AggregationId,
    pub server: Arc<str>,
}

impl CacheKey {
    pub fn new(aggregation: AggregationId, server: impl Into<Arc<str>>) -> Self {
        Self {
            aggregation,
            server: server.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.aggregation, self.server)
    }
}

/// When a cache entry stops being served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Served until evicted
    Sticky,
    /// Served until the given instant
    At(Instant),
}

impl Expiry {
    /// Expiry `ttl` from now
    pub fn after(ttl: Duration) -> Self {
        Self::At(Instant::now() + ttl)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        match self {
            Self::Sticky => false,
            Self::At(deadline) => now >= *deadline,
        }
    }
}

/// Cached value with its expiry
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub expiry: Expiry,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, expiry: Expiry) -> Self {
        Self { value, expiry }
    }

    /// Check if the entry is expired
    pub fn is_expired(&self) -> bool {
        self.expiry.is_expired(Instant::now())
    }
}
