//! Memory Store Module
//!
//! Expiring key/value table held in process memory. Knows nothing about
//! persistence; the scope manager snapshots it through [`MemoryStore::cache`].

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock, Ttl};

/// Whole-table shape shared by the store and its snapshots.
pub type CacheTable<V = Value> = HashMap<String, CacheEntry<V>>;

// == Memory Store ==
/// In-memory table with per-entry TTL and lazy expiration.
///
/// Expired entries are only dropped when read (or by an explicit
/// [`sweep_expired`](MemoryStore::sweep_expired)); until then they stay in
/// the table and in any snapshot taken of it.
#[derive(Debug)]
pub struct MemoryStore<V = Value> {
    /// Key-value storage
    table: CacheTable<V>,
    /// TTL in milliseconds for entries set with `Ttl::Default`
    default_ttl_ms: u64,
    /// Read statistics
    stats: CacheStats,
    clock: Arc<dyn Clock>,
}

impl<V> MemoryStore<V> {
    // == Constructor ==
    /// Creates an empty store using the system clock.
    ///
    /// # Arguments
    /// * `default_ttl_ms` - Default TTL in milliseconds, 0 = never expires
    pub fn new(default_ttl_ms: u64) -> Self {
        Self::with_clock(default_ttl_ms, Arc::new(SystemClock))
    }

    /// Creates an empty store reading time from `clock`.
    pub fn with_clock(default_ttl_ms: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            table: HashMap::new(),
            default_ttl_ms,
            stats: CacheStats::new(),
            clock,
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// The expiry is re-stamped from the current time on every write.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Ttl) {
        let entry = CacheEntry::new(
            value,
            self.clock.now_ms(),
            ttl.resolve(self.default_ttl_ms),
        );
        self.table.insert(key.into(), entry);
    }

    // == Get ==
    /// Returns the live entry for `key`.
    ///
    /// An entry whose expiry has been reached is removed and reported absent.
    pub fn get(&mut self, key: &str) -> Option<&CacheEntry<V>> {
        let now = self.clock.now_ms();
        let expired = match self.table.get(key) {
            Some(entry) => entry.is_expired(now),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.table.remove(key);
            self.stats.record_expired();
            debug!(key, "Dropped expired entry on read");
            return None;
        }

        self.stats.record_hit();
        self.table.get(key)
    }

    // == Remove ==
    /// Deletes the entry for `key`; returns whether one was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.table.remove(key).is_some()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.table.clear();
    }

    // == Reset Cache ==
    /// Replaces the whole table, as done when hydrating from a snapshot.
    ///
    /// Expiry times are taken as-is; stale entries go on their next read.
    pub fn reset_cache(&mut self, table: CacheTable<V>) {
        self.table = table;
    }

    // == Get Cache ==
    /// Full current table, including expired entries not yet read.
    pub fn cache(&self) -> &CacheTable<V> {
        &self.table
    }

    // == Sweep Expired ==
    /// Eagerly removes every expired entry and returns how many went.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.table.len();
        self.table.retain(|_, entry| !entry.is_expired(now));

        let removed = before - self.table.len();
        self.stats.record_swept(removed);
        removed
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.table.len());
        stats
    }

    pub fn default_ttl_ms(&self) -> u64 {
        self.default_ttl_ms
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
