//! TTL Janitor Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::cache::CacheStore;
use crate::config::MAX_CLEANUP_INTERVAL;
use crate::error::{CacheError, Result};

/// Handle to a running janitor task.
///
/// Dropping the handle without calling [`stop`](Janitor::stop) drops the
/// shutdown sender, which the task also treats as a stop request.
#[derive(Debug)]
pub struct Janitor {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Janitor {
    /// Spawns the janitor on the current Tokio runtime.
    ///
    /// The first sweep runs one full `interval` after spawning. Each sweep
    /// takes the write lock once, so callers never observe a partial sweep.
    /// The interval is clamped to `1ms..=MAX_CLEANUP_INTERVAL`.
    ///
    /// # Errors
    /// Returns [`CacheError::RuntimeUnavailable`] when called outside a
    /// Tokio runtime.
    pub fn spawn<V>(store: Arc<RwLock<CacheStore<V>>>, interval: Duration) -> Result<Self>
    where
        V: Clone + Send + Sync + 'static,
    {
        let runtime =
            Handle::try_current().map_err(|e| CacheError::RuntimeUnavailable(e.to_string()))?;
        let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();
        let interval = interval.clamp(Duration::from_millis(1), MAX_CLEANUP_INTERVAL);

        let handle = runtime.spawn(async move {
            info!(
                "Starting TTL janitor with interval of {} ms",
                interval.as_millis()
            );

            let start = Instant::now()
                .checked_add(interval)
                .unwrap_or_else(Instant::now);
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    // Fires on an explicit stop or when the sender is dropped
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {}
                }

                let removed = store.write().await.cleanup_expired();

                if removed > 0 {
                    info!("TTL cleanup: removed {} expired entries", removed);
                } else {
                    debug!("TTL cleanup: no expired entries found");
                }
            }

            info!("TTL janitor stopped");
        });

        Ok(Self { shutdown, handle })
    }

    /// Signals the task to exit and waits until it has.
    ///
    /// A sweep in progress always runs to completion first.
    pub async fn stop(self) {
        // The task may already be gone if it panicked; the join reports that
        let _ = self.shutdown.send(());

        if let Err(e) = self.handle.await {
            error!("TTL janitor did not shut down cleanly: {}", e);
        }
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
