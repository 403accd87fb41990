//! Persistent Module
//!
//! Scope manager tying one [`MemoryStore`] per durability scope to its
//! durable backend. Reads are always served from memory; the backend only
//! sees whole-table snapshots written by [`Persistent::flush`] and
//! [`Persistent::teardown`], and is read once at construction.

mod sync;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheStats, CacheTable, Clock, MemoryStore, SystemClock, Ttl};
use crate::config::Config;
use crate::error::Result;
use crate::keys::{CacheKey, Scope};
use crate::storage::DurableStorage;

pub use sync::{InvalidationPolicy, StorageEvent};

// == Scope State ==
/// Memory table, backend and flush bookkeeping for one scope.
#[derive(Debug)]
struct ScopeState {
    memory: MemoryStore,
    backend: Arc<dyn DurableStorage>,
    snapshot_key: String,
    /// Mutated since the last snapshot was written
    dirty: bool,
}

impl ScopeState {
    fn open(
        scope: Scope,
        snapshot_key: &str,
        backend: Arc<dyn DurableStorage>,
        default_ttl_ms: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut memory = MemoryStore::with_clock(default_ttl_ms, clock);

        match backend.get(snapshot_key) {
            Ok(Some(blob)) => match serde_json::from_str::<CacheTable>(&blob) {
                Ok(table) => {
                    info!(%scope, entries = table.len(), "Hydrated scope from snapshot");
                    memory.reset_cache(table);
                }
                Err(e) => warn!(%scope, error = %e, "Malformed snapshot, starting empty"),
            },
            Ok(None) => debug!(%scope, "No snapshot found, starting empty"),
            Err(e) => warn!(%scope, error = %e, "Snapshot unreadable, starting empty"),
        }

        Self {
            memory,
            backend,
            snapshot_key: snapshot_key.to_string(),
            dirty: false,
        }
    }

    fn flush(&mut self, scope: Scope) -> Result<()> {
        let blob = serde_json::to_string(self.memory.cache())?;
        self.backend.set(&self.snapshot_key, blob)?;
        self.dirty = false;
        debug!(%scope, entries = self.memory.len(), "Snapshot written");
        Ok(())
    }
}

// == Persistent ==
/// Two-tier cache context, constructed once at process start.
///
/// Owns the local and session memory tables; callers only ever get copies of
/// stored values back.
#[derive(Debug)]
pub struct Persistent {
    local: ScopeState,
    session: ScopeState,
    policy: InvalidationPolicy,
}

impl Persistent {
    // == Constructor ==
    /// Builds the context and hydrates each scope from its own backend.
    ///
    /// A missing, unreadable or malformed snapshot leaves that scope empty.
    pub fn open(
        config: &Config,
        local_backend: Arc<dyn DurableStorage>,
        session_backend: Arc<dyn DurableStorage>,
    ) -> Self {
        Self::open_with_clock(config, local_backend, session_backend, Arc::new(SystemClock))
    }

    pub fn open_with_clock(
        config: &Config,
        local_backend: Arc<dyn DurableStorage>,
        session_backend: Arc<dyn DurableStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            local: ScopeState::open(
                Scope::Local,
                &config.local_snapshot_key,
                local_backend,
                config.default_ttl_ms,
                clock.clone(),
            ),
            session: ScopeState::open(
                Scope::Session,
                &config.session_snapshot_key,
                session_backend,
                config.default_ttl_ms,
                clock,
            ),
            policy: config.invalidation_policy,
        }
    }

    fn state(&self, scope: Scope) -> &ScopeState {
        match scope {
            Scope::Local => &self.local,
            Scope::Session => &self.session,
        }
    }

    fn state_mut(&mut self, scope: Scope) -> &mut ScopeState {
        match scope {
            Scope::Local => &mut self.local,
            Scope::Session => &mut self.session,
        }
    }

    fn scopes_for_snapshot_key(&self, snapshot_key: &str) -> Vec<Scope> {
        Scope::ALL
            .into_iter()
            .filter(|&scope| self.state(scope).snapshot_key == snapshot_key)
            .collect()
    }

    // == Get ==
    /// Returns the stored value decoded as `T`, or None if absent or expired.
    ///
    /// A value that does not decode as `T` is also reported as None.
    pub fn get<T: DeserializeOwned>(&mut self, scope: Scope, key: CacheKey) -> Option<T> {
        let value = self.get_value(scope, key)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(%scope, %key, error = %e, "Stored value has unexpected shape");
                None
            }
        }
    }

    /// Returns a copy of the stored JSON value.
    pub fn get_value(&mut self, scope: Scope, key: CacheKey) -> Option<Value> {
        self.get_entry(scope, key).map(|entry| entry.value.clone())
    }

    /// Returns the live entry, expiry metadata included.
    pub fn get_entry(&mut self, scope: Scope, key: CacheKey) -> Option<&CacheEntry<Value>> {
        self.state_mut(scope).memory.get(key.as_str())
    }

    // == Set ==
    /// Stores a plain snapshot of `value` with the default TTL.
    ///
    /// With `flush_now` the whole scope is written to its backend at once;
    /// otherwise the write waits for the next flush or teardown.
    pub fn set<V: Serialize>(
        &mut self,
        scope: Scope,
        key: CacheKey,
        value: V,
        flush_now: bool,
    ) -> Result<()> {
        self.set_with_ttl(scope, key, value, Ttl::Default, flush_now)
    }

    pub fn set_with_ttl<V: Serialize>(
        &mut self,
        scope: Scope,
        key: CacheKey,
        value: V,
        ttl: Ttl,
        flush_now: bool,
    ) -> Result<()> {
        let value = serde_json::to_value(value)?;

        let state = self.state_mut(scope);
        state.memory.set(key.as_str(), value, ttl);
        state.dirty = true;

        if flush_now {
            self.flush(scope)?;
        }
        Ok(())
    }

    // == Remove ==
    /// Deletes `key` from memory only; returns whether it was present.
    pub fn remove(&mut self, scope: Scope, key: CacheKey) -> bool {
        let state = self.state_mut(scope);
        let removed = state.memory.remove(key.as_str());
        state.dirty |= removed;
        removed
    }

    // == Clear ==
    /// Empties one scope in memory; the backend catches up on the next flush.
    pub fn clear(&mut self, scope: Scope) {
        let state = self.state_mut(scope);
        state.memory.clear();
        state.dirty = true;
    }

    pub fn clear_all(&mut self) {
        for scope in Scope::ALL {
            self.clear(scope);
        }
    }

    // == Flush ==
    /// Writes the scope's whole table to its backend under its snapshot key.
    pub fn flush(&mut self, scope: Scope) -> Result<()> {
        self.state_mut(scope).flush(scope)
    }

    /// Flushes only scopes mutated since their last snapshot.
    ///
    /// Returns the scopes written.
    pub fn flush_dirty(&mut self) -> Result<Vec<Scope>> {
        let mut flushed = Vec::new();
        for scope in Scope::ALL {
            if self.is_dirty(scope) {
                self.flush(scope)?;
                flushed.push(scope);
            }
        }
        Ok(flushed)
    }

    /// Snapshots every scope, dirty or not.
    ///
    /// Each scope is attempted even if an earlier one fails; the first error
    /// is returned.
    pub fn flush_all(&mut self) -> Result<()> {
        let mut first_error = None;
        for scope in Scope::ALL {
            if let Err(e) = self.flush(scope) {
                warn!(%scope, error = %e, "Scope flush failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // == Teardown ==
    /// Snapshots every scope unconditionally before the process goes away.
    pub fn teardown(&mut self) -> Result<()> {
        self.flush_all()?;
        info!("All scopes flushed on teardown");
        Ok(())
    }

    // == Sweep Expired ==
    /// Eagerly drops expired entries from every scope.
    pub fn sweep_expired(&mut self) -> usize {
        let mut total = 0;
        for scope in Scope::ALL {
            let state = self.state_mut(scope);
            let removed = state.memory.sweep_expired();
            state.dirty |= removed > 0;
            total += removed;
        }
        total
    }

    // == Accessors ==
    pub fn is_dirty(&self, scope: Scope) -> bool {
        self.state(scope).dirty
    }

    pub fn snapshot_key(&self, scope: Scope) -> &str {
        &self.state(scope).snapshot_key
    }

    /// Full in-memory table of a scope, as it would be snapshotted.
    pub fn table(&self, scope: Scope) -> &CacheTable {
        self.state(scope).memory.cache()
    }

    pub fn stats(&self, scope: Scope) -> CacheStats {
        self.state(scope).memory.stats()
    }

    pub fn policy(&self) -> InvalidationPolicy {
        self.policy
    }

    // == Local Scope ==
    pub fn get_local<T: DeserializeOwned>(&mut self, key: CacheKey) -> Option<T> {
        self.get(Scope::Local, key)
    }

    pub fn set_local<V: Serialize>(&mut self, key: CacheKey, value: V, flush_now: bool) -> Result<()> {
        self.set(Scope::Local, key, value, flush_now)
    }

    pub fn remove_local(&mut self, key: CacheKey) {
        self.remove(Scope::Local, key);
    }

    pub fn clear_local(&mut self) {
        self.clear(Scope::Local);
    }

    // == Session Scope ==
    pub fn get_session<T: DeserializeOwned>(&mut self, key: CacheKey) -> Option<T> {
        self.get(Scope::Session, key)
    }

    pub fn set_session<V: Serialize>(
        &mut self,
        key: CacheKey,
        value: V,
        flush_now: bool,
    ) -> Result<()> {
        self.set(Scope::Session, key, value, flush_now)
    }

    pub fn remove_session(&mut self, key: CacheKey) {
        self.remove(Scope::Session, key);
    }

    pub fn clear_session(&mut self) {
        self.clear(Scope::Session);
    }
}
