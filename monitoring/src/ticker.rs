//! Ticker - explicit periodic scheduler
//!
//! Each component that refreshes on a timer owns its own `Ticker` and ties
//! it to its own lifecycle: `start` when mounted, `stop` when disposed.
//! Dropping a running ticker aborts its task, so no timer outlives its owner.

use common::FeedError;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

struct RunningTicker {
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

/// Calls a callback once per period on the tokio runtime
pub struct Ticker {
    name: String,
    period: Duration,
    running: Option<RunningTicker>,
}

impl Ticker {
    pub fn new(name: impl Into<String>, period: Duration) -> Self {
        Self {
            name: name.into(),
            period,
            running: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    /// Spawn the tick loop. The first tick fires one period after starting;
    /// the callback receives the 1-based tick number. A zero period is
    /// rejected.
    pub fn start<F>(&mut self, mut on_tick: F) -> Result<(), FeedError>
    where
        F: FnMut(u64) + Send + 'static,
    {
        if self.is_running() {
            return Err(FeedError::TickerRunning(self.name.clone()));
        }
        if self.period.is_zero() {
            return Err(FeedError::ZeroPeriod(self.name.clone()));
        }

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let name = self.name.clone();
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut ticks = 0u64;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        ticks += 1;
                        on_tick(ticks);
                    }
                    // Explicit stop, or every sender dropped
                    _ = shutdown_rx.recv() => break,
                }
            }

            debug!("Ticker {} exited after {} ticks", name, ticks);
        });

        info!("Ticker {} started every {:?}", self.name, self.period);
        self.running = Some(RunningTicker {
            shutdown_tx,
            handle,
        });
        Ok(())
    }

    /// Stop the tick loop and wait for it to exit. No-op when not running.
    pub async fn stop(&mut self) -> Result<(), FeedError> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };

        // The loop may already be gone; awaiting the handle covers both cases
        let _ = running.shutdown_tx.send(()).await;
        running
            .handle
            .await
            .map_err(|_| FeedError::TickerPanicked(self.name.clone()))?;

        info!("Ticker {} stopped", self.name);
        Ok(())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.handle.abort();
        }
    }
}
