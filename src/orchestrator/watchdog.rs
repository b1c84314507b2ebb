//! # Inactivity Watchdog
//!
//! Re-centers the right stick once mouse motion stops.
//!
//! Relative mouse deltas have no "rest" event: when the mouse stops moving the
//! driver simply stops reporting. The watchdog notices the silence and asks for
//! one reset per idle period.

use std::time::Duration;

use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Tracks the time of the last mouse motion.
#[derive(Debug, Clone)]
pub struct InactivityWatchdog {
    threshold: Duration,
    last_motion: Instant,
    /// `true` once a reset has been issued for the current idle period.
    centered: bool,
}

impl InactivityWatchdog {
    /// Creates a watchdog that considers the stick centered.
    #[must_use]
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last_motion: Instant::now(),
            centered: true,
        }
    }

    /// Records mouse motion at `now`.
    pub fn record_motion(&mut self, now: Instant) {
        self.last_motion = now;
        self.centered = false;
    }

    /// Returns `true` when the stick must be reset.
    ///
    /// Fires at most once between two calls to [`record_motion`](Self::record_motion).
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.centered || now.saturating_duration_since(self.last_motion) <= self.threshold {
            return false;
        }
        self.centered = true;
        true
    }

    #[must_use]
    pub fn is_centered(&self) -> bool {
        self.centered
    }

    #[must_use]
    pub fn threshold(&self) -> Duration {
        self.threshold
    }
}

/// Calls `on_tick` every `period` until `cancel` fires.
pub(crate) async fn run<F>(period: Duration, cancel: CancellationToken, mut on_tick: F)
where
    F: FnMut(Instant) + Send,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!("Inactivity watchdog started ({:?} poll interval)", period);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            now = ticker.tick() => on_tick(now),
        }
    }
    debug!("Inactivity watchdog stopped");
}
