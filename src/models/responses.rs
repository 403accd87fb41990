//! Response DTOs for the cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::keys::{CacheKey, Scope};

/// Response body for GET /cache/:scope/:key
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResponse {
    pub scope: Scope,
    pub key: CacheKey,
    /// The stored value
    pub value: Value,
    /// Expiry (Unix milliseconds), null = never expires
    pub expiry_at: Option<u64>,
}

impl GetResponse {
    pub fn new(scope: Scope, key: CacheKey, value: Value, expiry_at: Option<u64>) -> Self {
        Self {
            scope,
            key,
            value,
            expiry_at,
        }
    }
}

/// Response body for PUT /cache/:scope/:key
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    pub scope: Scope,
    pub key: CacheKey,
    /// Whether the scope snapshot was written
    pub flushed: bool,
}

impl SetResponse {
    pub fn new(scope: Scope, key: CacheKey, flushed: bool) -> Self {
        Self {
            message: format!("Key '{}' set in {} scope", key, scope),
            scope,
            key,
            flushed,
        }
    }
}

/// Response body for DELETE /cache/:scope/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    pub scope: Scope,
    pub key: CacheKey,
}

impl DeleteResponse {
    pub fn new(scope: Scope, key: CacheKey) -> Self {
        Self {
            message: format!("Key '{}' removed from {} scope", key, scope),
            scope,
            key,
        }
    }
}

/// Response body for clear, flush and storage-event operations
///
/// Lists the scopes the operation touched.
#[derive(Debug, Clone, Serialize)]
pub struct ScopesResponse {
    pub message: String,
    pub scopes: Vec<Scope>,
}

impl ScopesResponse {
    pub fn new(message: impl Into<String>, scopes: Vec<Scope>) -> Self {
        Self {
            message: message.into(),
            scopes,
        }
    }
}

/// Statistics for one scope
#[derive(Debug, Clone, Serialize)]
pub struct ScopeStatsResponse {
    pub snapshot_key: String,
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub swept: u64,
    /// Current number of entries in memory, including unread expired ones
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Mutated since the last snapshot
    pub dirty: bool,
}

impl ScopeStatsResponse {
    pub fn new(snapshot_key: impl Into<String>, stats: &CacheStats, dirty: bool) -> Self {
        Self {
            snapshot_key: snapshot_key.into(),
            hits: stats.hits,
            misses: stats.misses,
            expired: stats.expired,
            swept: stats.swept,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            dirty,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub local: ScopeStatsResponse,
    pub session: ScopeStatsResponse,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
