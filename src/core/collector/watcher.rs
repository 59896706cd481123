//! Change-stream driven cache invalidation

use super::execution::SampleCache;
use crate::core::cache_manager::CacheKey;
use crate::core::driver::Driver;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Watches one collection and evicts a cache entry on every change
pub(crate) struct CacheInvalidator {
    pub key: CacheKey,
    pub driver: Arc<dyn Driver>,
    pub database: String,
    pub collection: String,
    pub cache: Arc<SampleCache>,
}

impl CacheInvalidator {
    /// Runs until the change stream ends; a failed setup is not retried
    pub async fn run(self) {
        let mut events = match self
            .driver
            .watch(&self.database, &self.collection, Vec::new())
            .await
        {
            Ok(events) => events,
            Err(err) => {
                error!(
                    key = %self.key,
                    database = %self.database,
                    collection = %self.collection,
                    error = %err,
                    "failed to start change stream"
                );
                return;
            }
        };

        info!(
            key = %self.key,
            database = %self.database,
            collection = %self.collection,
            "watching for changes"
        );

        while let Some(event) = events.next().await {
            match event {
                Ok(event) => {
                    debug!(
                        key = %self.key,
                        namespace = ?event.namespace,
                        "change detected, evicting cache entry"
                    );
                    self.cache.evict(&self.key);
                }
                Err(err) if err.is_decode() => {
                    warn!(key = %self.key, error = %err, "failed to decode change event");
                }
                Err(err) => {
                    error!(key = %self.key, error = %err, "change stream failed");
                    break;
                }
            }
        }

        debug!(key = %self.key, "change stream closed");
    }
}
