//! Persistent Cache - A two-tier TTL cache
//!
//! Serves reads from an in-memory table with lazy TTL expiry and snapshots
//! whole tables to a durable backend, per durability scope.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod keys;
pub mod models;
pub mod persistent;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{CacheError, Result};
pub use keys::{CacheKey, Scope};
pub use persistent::{InvalidationPolicy, Persistent, StorageEvent};
pub use tasks::spawn_sweep_task;
