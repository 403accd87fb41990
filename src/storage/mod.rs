//! Durable Storage Module
//!
//! Adapters for the slow tier that snapshots are written to. A backend maps
//! a snapshot key to an opaque blob and may be shared by several contexts.

mod file;
mod memory;

use std::fmt::Debug;

use crate::error::Result;

pub use file::FileBackend;
pub use memory::MemoryBackend;

// == Durable Storage Trait ==
/// Synchronous key/blob store holding whole-table snapshots.
pub trait DurableStorage: Debug + Send + Sync {
    /// Returns the blob stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites the blob stored under `key`.
    fn set(&self, key: &str, blob: String) -> Result<()>;
}
