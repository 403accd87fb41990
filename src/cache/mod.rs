//! Cache Module
//!
//! Provides the in-memory tier: expiring entries with lazy TTL checks.

mod clock;
mod entry;
mod memory;
mod stats;
mod ttl;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use memory::{CacheTable, MemoryStore};
pub use stats::CacheStats;
pub use ttl::Ttl;
