//! Background sweep of expired sessions.
//!
//! Lazy expiry only reclaims sessions that are looked up again. Deployments
//! that want idle, never-revisited sessions reclaimed eagerly run a
//! [`SessionSweeper`] next to the store.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = SessionStore::new(SessionConfig::from_env()?)?;
//! let sweeper = SessionSweeper::spawn(store.clone(), Duration::from_secs(60));
//!
//! // ... serve requests ...
//!
//! sweeper.shutdown().await;
//! ```

use crate::constants::sweeper::MIN_SWEEP_PERIOD;
use crate::environment::Clock;
use crate::store::SessionStore;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a running sweep task.
#[derive(Debug)]
pub struct SessionSweeper {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SessionSweeper {
    /// Spawn a task that calls [`SessionStore::cleanup_expired_sessions`]
    /// every `period` (at least one second).
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn<C>(store: SessionStore<C>, period: Duration) -> Self
    where
        C: Clock + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let period = period.max(MIN_SWEEP_PERIOD);
        let handle = tokio::spawn(run(store, period, shutdown_rx));

        Self {
            shutdown: shutdown_tx,
            handle,
        }
    }

    /// Signal the task to stop and wait for it to finish.
    pub async fn shutdown(self) {
        // A send error means the task already stopped.
        self.shutdown.send(true).ok();

        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "Session sweeper task failed");
        }
    }

    /// `true` once the task has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

async fn run<C: Clock>(
    store: SessionStore<C>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(period_secs = period.as_secs(), "Starting session sweeper");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                store.cleanup_expired_sessions();
            }

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::info!("Session sweeper stopped");
}
