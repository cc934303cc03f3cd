//! Background snapshot refresh.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Periodically refreshes the release snapshot held in [`AppState`].
pub struct SnapshotPoller {
    state: Arc<AppState>,
    interval: Duration,
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl SnapshotPoller {
    pub fn new(state: Arc<AppState>, interval: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            state,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start polling. The first fetch happens immediately.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Snapshot poller already running");
            return;
        }

        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);
        let interval = self.interval;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "Snapshot poller started");
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Snapshot poller received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }
                        // Failures are logged and counted by refresh itself.
                        if let Ok(count) = state.refresh().await {
                            debug!(releases = count, "Poll complete");
                        }
                    }
                }
            }
            info!("Snapshot poller stopped");
        });
    }

    /// Stop polling.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Snapshot poller not running");
            return;
        }
        let _ = self.shutdown_tx.send(());
    }
}
