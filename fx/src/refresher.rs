//! Periodic rate refresh as a cancellable background task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::provider::RateProvider;
use crate::snapshot::RateSnapshot;

/// Counters reported when a refresher stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    /// Snapshots fetched and delivered.
    pub refreshes: u64,
    /// Fetches that failed; the consumer kept its previous snapshot.
    pub failures: u64,
}

/// Fetches a snapshot immediately and then once per interval.
pub struct RateRefresher {
    provider: Arc<dyn RateProvider>,
    interval: Duration,
}

impl RateRefresher {
    /// Create a refresher polling `provider` every `interval`.
    pub fn new(provider: Arc<dyn RateProvider>, interval: Duration) -> Self {
        Self { provider, interval }
    }

    /// Spawn the refresh loop, delivering each fresh snapshot into `events`.
    ///
    /// The loop ends when the handle is stopped or dropped, or when the
    /// receiving side of `events` is closed.
    ///
    /// # Panics
    ///
    /// Panics if the interval is zero or if called outside a Tokio runtime.
    pub fn start<E>(self, events: mpsc::Sender<E>) -> RefreshHandle
    where
        E: From<Arc<RateSnapshot>> + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(events, shutdown_rx));

        RefreshHandle {
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    async fn run<E>(self, events: mpsc::Sender<E>, mut shutdown_rx: oneshot::Receiver<()>) -> RefreshStats
    where
        E: From<Arc<RateSnapshot>> + Send + 'static,
    {
        let mut stats = RefreshStats::default();
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            provider = self.provider.name(),
            interval_ms = self.interval.as_millis() as u64,
            "Rate refresher started"
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => {}
            }

            let fetched = tokio::select! {
                biased;
                _ = &mut shutdown_rx => break,
                fetched = self.provider.fetch_latest_snapshot() => fetched,
            };

            match fetched {
                Ok(snapshot) => {
                    stats.refreshes += 1;
                    debug!(
                        provider = self.provider.name(),
                        currencies = snapshot.len(),
                        "Fetched rate snapshot"
                    );
                    if events.send(E::from(Arc::new(snapshot))).await.is_err() {
                        debug!("Snapshot consumer closed");
                        break;
                    }
                }
                Err(e) => {
                    stats.failures += 1;
                    warn!(
                        provider = self.provider.name(),
                        error = %e,
                        "Rate fetch failed, keeping previous snapshot"
                    );
                }
            }
        }

        info!(
            refreshes = stats.refreshes,
            failures = stats.failures,
            "Rate refresher stopped"
        );
        stats
    }
}

/// Owning handle of a running refresher.
///
/// Dropping the handle aborts the task, so no snapshot is delivered after
/// the owner is gone.
pub struct RefreshHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<RefreshStats>>,
}

impl RefreshHandle {
    /// Signal the loop to stop and wait for it.
    pub async fn stop(mut self) -> RefreshStats {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        match self.task.take() {
            Some(task) => task.await.unwrap_or_default(),
            None => RefreshStats::default(),
        }
    }

    /// Whether the loop is still running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
