//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// Represents a single cache entry with value and expiry metadata.
///
/// Serialized as `{"value": ..., "expiryAt": <ms|null>}` inside a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    #[serde(default)]
    pub expiry_at: Option<u64>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped at `now_ms`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `now_ms` - Write time (Unix milliseconds)
    /// * `ttl_ms` - Effective TTL in milliseconds, None = never expires
    pub fn new(value: V, now_ms: u64, ttl_ms: Option<u64>) -> Self {
        Self {
            value,
            expiry_at: ttl_ms.map(|ttl| now_ms.saturating_add(ttl)),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is expired once the current time reaches its expiry time,
    /// so a fully elapsed TTL is never readable.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match self.expiry_at {
            Some(expiry) => now_ms >= expiry,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.expiry_at.map(|expiry| expiry.saturating_sub(now_ms))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new("test_value".to_string(), 1_000, None);

        assert_eq!(entry.value, "test_value");
        assert!(entry.expiry_at.is_none());
        assert!(!entry.is_expired(u64::MAX));
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("test_value".to_string(), 1_000, Some(60_000));

        assert_eq!(entry.expiry_at, Some(61_000));
        assert!(!entry.is_expired(1_000));
        assert!(!entry.is_expired(60_999));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("test".to_string(), 1_000, Some(500));

        assert!(entry.is_expired(1_500), "Entry should be expired at boundary");
        assert!(entry.is_expired(2_000));
    }

    #[test]
    fn test_ttl_remaining_ms() {
        let entry = CacheEntry::new("test".to_string(), 1_000, Some(10_000));

        assert_eq!(entry.ttl_remaining_ms(4_000), Some(7_000));
        assert_eq!(entry.ttl_remaining_ms(20_000), Some(0));
    }

    #[test]
    fn test_ttl_remaining_no_expiration() {
        let entry = CacheEntry::new("test".to_string(), 1_000, None);
        assert!(entry.ttl_remaining_ms(5_000).is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let entry = CacheEntry::new(json!("tok123"), 1_000, Some(500));
        let encoded = serde_json::to_value(&entry).unwrap();

        assert_eq!(encoded, json!({"value": "tok123", "expiryAt": 1_500}));
    }

    #[test]
    fn test_deserialize_without_expiry_field() {
        let entry: CacheEntry<String> = serde_json::from_str(r#"{"value":"v"}"#).unwrap();
        assert_eq!(entry.value, "v");
        assert!(entry.expiry_at.is_none());
    }
}
