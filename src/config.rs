//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::persistent::InvalidationPolicy;

/// Default TTL: 7 days in milliseconds
pub const DEFAULT_TTL_MS: u64 = 7 * 24 * 60 * 60 * 1000;

/// Snapshot key for the local scope
pub const LOCAL_SNAPSHOT_KEY: &str = "app-local-cache";

/// Snapshot key for the session scope
pub const SESSION_SNAPSHOT_KEY: &str = "app-session-cache";

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in milliseconds for entries set without an explicit TTL, 0 = never expire
    pub default_ttl_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Directory holding the durable snapshots
    pub storage_dir: PathBuf,
    /// Background sweep interval in seconds, 0 = lazy expiry only
    pub sweep_interval: u64,
    /// Durable key of the local scope snapshot
    pub local_snapshot_key: String,
    /// Durable key of the session scope snapshot
    pub session_snapshot_key: String,
    /// Reaction to a snapshot changed by another context
    pub invalidation_policy: InvalidationPolicy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 7 days)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STORAGE_DIR` - Snapshot directory (default: ./data)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 0, disabled)
    /// - `LOCAL_SNAPSHOT_KEY` - Local snapshot key (default: app-local-cache)
    /// - `SESSION_SNAPSHOT_KEY` - Session snapshot key (default: app-session-cache)
    /// - `INVALIDATION_POLICY` - `invalidate` or `reload` (default: invalidate)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl_ms: parse_env("DEFAULT_TTL_MS").unwrap_or(defaults.default_ttl_ms),
            server_port: parse_env("SERVER_PORT").unwrap_or(defaults.server_port),
            storage_dir: parse_env("STORAGE_DIR").unwrap_or(defaults.storage_dir),
            sweep_interval: parse_env("SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            local_snapshot_key: parse_env("LOCAL_SNAPSHOT_KEY")
                .unwrap_or(defaults.local_snapshot_key),
            session_snapshot_key: parse_env("SESSION_SNAPSHOT_KEY")
                .unwrap_or(defaults.session_snapshot_key),
            invalidation_policy: parse_env("INVALIDATION_POLICY")
                .unwrap_or(defaults.invalidation_policy),
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl_ms: DEFAULT_TTL_MS,
            server_port: 3000,
            storage_dir: PathBuf::from("./data"),
            sweep_interval: 0,
            local_snapshot_key: LOCAL_SNAPSHOT_KEY.to_string(),
            session_snapshot_key: SESSION_SNAPSHOT_KEY.to_string(),
            invalidation_policy: InvalidationPolicy::Invalidate,
        }
    }
}
