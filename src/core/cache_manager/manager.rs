//! Cache manager implementation

use super::types::{CacheEntry, CacheKey, Expiry};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

/// Process-local result cache guarded by a single lock
#[derive(Debug)]
pub struct ResultCache<T> {
    entries: Mutex<HashMap<CacheKey, CacheEntry<T>>>,
}

impl<T> Default for ResultCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> ResultCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached value, removing the entry if it has expired
    pub fn get(&self, key: &CacheKey) -> Option<T> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                debug!(key = %key, "cache hit");
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            debug!(key = %key, "cache entry expired");
            entries.remove(key);
        }

        None
    }

    /// Store a value, replacing any previous entry for the key
    pub fn store(&self, key: CacheKey, value: T, expiry: Expiry) {
        debug!(key = %key, expiry = ?expiry, "storing cache entry");
        self.entries.lock().insert(key, CacheEntry::new(value, expiry));
    }

    /// Remove an entry; returns whether one was present
    pub fn evict(&self, key: &CacheKey) -> bool {
        let removed = self.entries.lock().remove(key).is_some();
        if removed {
            debug!(key = %key, "cache entry evicted");
        }
        removed
    }

    /// Whether an entry is present, expired or not
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
