//! In-process durable backend.
//!
//! Clones share the same map, so two contexts built over clones of one
//! backend see each other's snapshots the way tabs share one origin.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{CacheError, Result};
use crate::storage::DurableStorage;

// == Memory Backend ==
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    blobs: Arc<Mutex<HashMap<String, String>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every stored blob.
    pub fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }

    /// Makes every subsequent write fail, as a full or unavailable backend would.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.blobs
            .lock()
            .map_err(|_| CacheError::Storage("memory backend lock poisoned".to_string()))
    }
}

impl DurableStorage for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, blob: String) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::Storage(format!(
                "write to '{}' rejected: backend unavailable",
                key
            )));
        }

        self.lock()?.insert(key.to_string(), blob);
        Ok(())
    }
}
