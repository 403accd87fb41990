//! Cross-context invalidation.
//!
//! Another context sharing the durable backend reports its writes as
//! [`StorageEvent`]s; this module decides what the local memory tier does.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::CacheTable;
use crate::keys::Scope;
use crate::persistent::Persistent;

// == Storage Event ==
/// A durable-storage mutation made by a different context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEvent {
    /// Changed snapshot key, None or empty = the backend was cleared wholesale
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub old_value: Option<String>,
    #[serde(default)]
    pub new_value: Option<String>,
}

impl StorageEvent {
    /// Event for a wholesale clear of the backend.
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Event for one snapshot key being overwritten.
    pub fn changed(
        key: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        Self {
            key: Some(key.into()),
            old_value,
            new_value,
        }
    }

    /// Both sides of the change carry a non-empty blob.
    fn is_overwrite(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.old_value) && present(&self.new_value)
    }
}

// == Invalidation Policy ==
/// What to do with a scope whose snapshot another context overwrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidationPolicy {
    /// Drop the in-memory table and ignore the new snapshot
    #[default]
    Invalidate,
    /// Replace the in-memory table with the new snapshot
    Reload,
}

impl FromStr for InvalidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "invalidate" => Ok(InvalidationPolicy::Invalidate),
            "reload" => Ok(InvalidationPolicy::Reload),
            other => Err(format!("unknown invalidation policy '{}'", other)),
        }
    }
}

impl fmt::Display for InvalidationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidationPolicy::Invalidate => f.write_str("invalidate"),
            InvalidationPolicy::Reload => f.write_str("reload"),
        }
    }
}

impl Persistent {
    // == Storage Changed ==
    /// Reacts to a durable-storage change made by another context.
    ///
    /// - no key or an empty key: every scope is cleared
    /// - a recognized snapshot key with old and new blobs: every scope using
    ///   that key is cleared, or reloaded from `new_value` under
    ///   `InvalidationPolicy::Reload`
    /// - anything else is ignored
    ///
    /// Returns the scopes whose memory table was replaced.
    pub fn on_storage_changed(&mut self, event: &StorageEvent) -> Vec<Scope> {
        let Some(key) = event.key.as_deref().filter(|k| !k.is_empty()) else {
            info!("Durable storage cleared elsewhere, dropping all scopes");
            for scope in Scope::ALL {
                self.invalidate(scope);
            }
            return Scope::ALL.to_vec();
        };

        if !event.is_overwrite() {
            debug!(key, "Ignoring storage event without both old and new values");
            return Vec::new();
        }

        let scopes = self.scopes_for_snapshot_key(key);
        if scopes.is_empty() {
            debug!(key, "Ignoring storage event for unrelated key");
            return scopes;
        }

        for &scope in &scopes {
            match (self.policy, event.new_value.as_deref()) {
                (InvalidationPolicy::Reload, Some(blob)) => self.reload(scope, blob),
                _ => self.invalidate(scope),
            }
        }
        scopes
    }

    fn invalidate(&mut self, scope: Scope) {
        let state = self.state_mut(scope);
        state.memory.clear();
        state.dirty = false;
        info!(%scope, "Scope invalidated by another context");
    }

    fn reload(&mut self, scope: Scope, blob: &str) {
        match serde_json::from_str::<CacheTable>(blob) {
            Ok(table) => {
                let state = self.state_mut(scope);
                state.memory.reset_cache(table);
                state.dirty = false;
                info!(%scope, entries = state.memory.len(), "Scope reloaded from another context");
            }
            Err(e) => {
                warn!(%scope, error = %e, "Unreadable snapshot from another context");
                self.invalidate(scope);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_str() {
        assert_eq!("reload".parse::<InvalidationPolicy>(), Ok(InvalidationPolicy::Reload));
        assert_eq!("INVALIDATE".parse::<InvalidationPolicy>(), Ok(InvalidationPolicy::Invalidate));
        assert!("refresh".parse::<InvalidationPolicy>().is_err());
    }

    #[test]
    fn test_event_deserialize_camel_case() {
        let event: StorageEvent =
            serde_json::from_str(r#"{"key":"app-local-cache","oldValue":"{}","newValue":"{}"}"#)
                .unwrap();
        assert_eq!(event.key.as_deref(), Some("app-local-cache"));
        assert!(event.is_overwrite());
    }

    #[test]
    fn test_empty_blob_is_not_an_overwrite() {
        let event = StorageEvent::changed("k", Some(String::new()), Some("{}".into()));
        assert!(!event.is_overwrite());
        assert!(!StorageEvent::changed("k", None, Some("{}".into())).is_overwrite());
    }

    #[test]
    fn test_cleared_event_has_no_key() {
        assert!(StorageEvent::cleared().key.is_none());
    }
}
