//! Expired Entry Cleanup Task
//!
//! Optional background task for long-lived processes. The default cache only
//! drops expired entries when they are read again; this task purges them on a
//! fixed interval so memory does not hold dead responses until eviction.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::LruApiCache;

/// Spawns a task that purges expired entries from `cache` every
/// `cleanup_interval_secs` seconds.
///
/// The task never finishes on its own; abort the returned handle to stop it.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(LruApiCache::new(1000, 300));
/// let config = ClientConfig::builder().api_key(key).cache(cache.clone()).build()?;
/// let cleanup_handle = spawn_cleanup_task(cache, 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: Arc<LruApiCache>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting cache cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired();
            if removed > 0 {
                info!("Cache cleanup: removed {} expired entries", removed);
            } else {
                debug!("Cache cleanup: no expired entries found");
            }
        }
    })
}
