//! TTL Sweep Task
//!
//! Optional background task that purges expired entries eagerly, so that
//! memory and snapshots do not carry entries nobody reads again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::persistent::Persistent;

/// Spawns a background task that periodically sweeps every scope.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. It acquires a write lock on the cache context for each
/// sweep. Lazy expiry on read keeps working whether or not this runs.
///
/// # Arguments
/// * `cache` - Shared cache context
/// * `sweep_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_sweep_task(
    cache: Arc<RwLock<Persistent>>,
    sweep_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL sweep task with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.sweep_expired()
            };

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}
