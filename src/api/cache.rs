//! In-memory query response cache
//!
//! Responses are keyed by the query text with all whitespace removed, so two
//! documents that differ only in formatting share an entry. Entries expire
//! after a fixed TTL, and the whole cache is cleared after any successful
//! mutation. Capacity is bounded: inserting into a full cache evicts the
//! oldest entry.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long an entry may be served after it was stored
    pub ttl: Duration,

    /// Maximum number of entries held at once
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10),
            capacity: 256,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    stored_at: Instant,
}

/// Time-boxed response cache keyed by normalized query text
#[derive(Debug)]
pub struct QueryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    config: CacheConfig,
}

/// Normalize a query document into its cache key by dropping all whitespace.
/// Queries that differ only in formatting collide on purpose.
fn cache_key(query: &str) -> String {
    query.chars().filter(|c| !c.is_whitespace()).collect()
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Look up a fresh entry for the given query document.
    ///
    /// Expired entries are removed on access.
    pub fn get(&self, query: &str) -> Option<Value> {
        let key = cache_key(query);
        let mut entries = self.lock();

        let expired = match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < self.config.ttl => {
                return Some(entry.data.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.remove(&key);
        }
        None
    }

    /// Store a response for the given query document.
    pub fn insert(&self, query: &str, data: Value) {
        let key = cache_key(query);
        let mut entries = self.lock();

        if !entries.contains_key(&key) && entries.len() >= self.config.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                tracing::debug!(key = %oldest, "evicting oldest cache entry");
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            CacheEntry {
                data,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every entry. Called after successful mutations so reads never
    /// observe pre-mutation state.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
