//! Fixed-interval tick source.
//!
//! The countdown itself is synchronous; this is the one recurring scheduled
//! operation that feeds it. Ticks are delivered over a bounded channel so a
//! slow consumer delays the next tick instead of queueing a burst.
//!
//! ```ignore
//! let mut ticks = Ticker::new(Duration::from_secs(1)).spawn();
//! while ticks.recv().await.is_some() {
//!     if let Some(event) = cycle.tick() { /* ... */ }
//! }
//! ```
//!
//! Dropping or cancelling the [`TickHandle`] aborts the background task, so
//! no tick can reach state whose owner has gone away.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

pub const DEFAULT_TICK: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    period: Duration,
}

impl Ticker {
    /// A zero period is bumped to one millisecond.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start ticking. The first tick arrives one full period from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self) -> TickHandle {
        let period = self.period;
        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        TickHandle {
            rx,
            task,
            cancelled: false,
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}

/// Receiving end of a running [`Ticker`].
#[derive(Debug)]
pub struct TickHandle {
    rx: mpsc::Receiver<()>,
    task: JoinHandle<()>,
    cancelled: bool,
}

impl TickHandle {
    /// Wait for the next tick. Returns `None` once cancelled.
    pub async fn recv(&mut self) -> Option<()> {
        if self.cancelled {
            return None;
        }
        self.rx.recv().await
    }

    /// Stop scheduling further ticks. Idempotent.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.task.abort();
        self.rx.close();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
