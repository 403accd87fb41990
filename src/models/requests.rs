//! Request DTOs for the cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::Ttl;

/// Request body for the SET operation (PUT /cache/:scope/:key)
///
/// # Fields
/// - `value`: Any JSON value to store
/// - `ttlMs`: Optional TTL in milliseconds (uses default if not specified)
/// - `neverExpires`: Store without expiry
/// - `flush`: Write the scope snapshot right away
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRequest {
    /// The value to store
    pub value: Value,
    /// Optional TTL in milliseconds
    #[serde(default)]
    pub ttl_ms: Option<u64>,
    #[serde(default)]
    pub never_expires: bool,
    #[serde(default)]
    pub flush: bool,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.never_expires && self.ttl_ms.is_some() {
            return Some("ttlMs and neverExpires are mutually exclusive".to_string());
        }
        None
    }

    pub fn ttl(&self) -> Ttl {
        if self.never_expires {
            Ttl::Never
        } else {
            Ttl::from(self.ttl_ms)
        }
    }
}
