//! Countdown engine.
//!
//! A tick-driven countdown over whole seconds. Like the rest of the timer
//! module it owns no thread or timer: the caller invokes `tick()` once per
//! interval (see [`super::ticker`]) and reacts to the returned [`Tick`].
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused -> Running)* -> Complete
//!           ^                                   |
//!           +------------ start() --------------+
//! ```
//!
//! Completion is one-shot per run: the tick that reaches zero reports
//! [`Tick::Completed`], every later tick is ignored until `reset()` or a
//! `start()` from zero re-arms the countdown.

use serde::{Deserialize, Serialize};

/// Outcome of a single `tick()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The countdown was not running; nothing changed.
    Ignored,
    /// One second elapsed; carries the remaining seconds.
    Advanced(u64),
    /// This tick reached zero. Reported exactly once per run.
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    initial_secs: u64,
    remaining_secs: u64,
    running: bool,
    /// One-shot completion flag, cleared by `reset()` or `start()` at zero.
    completed: bool,
    /// Duration requested mid-run; applied on the next re-initialization.
    #[serde(default)]
    pending_initial_secs: Option<u64>,
}

impl Countdown {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            initial_secs,
            remaining_secs: initial_secs,
            running: false,
            completed: false,
            pending_initial_secs: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn initial_secs(&self) -> u64 {
        self.initial_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// True when the countdown has neither run nor been ticked since its last
    /// (re)initialization.
    pub fn is_pristine(&self) -> bool {
        !self.running && !self.completed && self.remaining_secs == self.initial_secs
    }

    /// 0.0 .. 1.0 progress within the current run.
    pub fn progress(&self) -> f64 {
        if self.initial_secs == 0 {
            return if self.completed { 1.0 } else { 0.0 };
        }
        1.0 - (self.remaining_secs as f64 / self.initial_secs as f64)
    }

    /// Readout label shown under the clock.
    pub fn status_label(&self) -> &'static str {
        if self.running {
            "Running"
        } else if self.remaining_secs == 0 {
            "Complete"
        } else {
            "Paused"
        }
    }

    /// Remaining time formatted for display.
    pub fn display(&self) -> String {
        format_duration(self.remaining_secs)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Returns `true` if the countdown was not already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        if self.remaining_secs == 0 {
            self.reinitialize();
        }
        self.running = true;
        true
    }

    /// Returns `true` if the countdown was running.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.reinitialize();
    }

    /// Call once per interval.
    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return Tick::Advanced(self.remaining_secs);
        }
        self.running = false;
        if self.completed {
            return Tick::Ignored;
        }
        self.completed = true;
        Tick::Completed
    }

    /// Reconfigure the duration.
    ///
    /// While stopped the countdown is re-initialized immediately. While
    /// running, the new value is held back until the next `reset()` or
    /// `start()` from zero, so the current run keeps its length.
    pub fn set_initial_secs(&mut self, secs: u64) {
        if self.running {
            self.pending_initial_secs = Some(secs);
        } else {
            self.pending_initial_secs = None;
            self.initial_secs = secs;
            self.remaining_secs = secs;
            self.completed = false;
        }
    }

    /// Hold `secs` back for the next re-initialization, leaving the current
    /// run untouched whether it is running or paused.
    pub fn defer_initial_secs(&mut self, secs: u64) {
        self.pending_initial_secs = Some(secs);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reinitialize(&mut self) {
        if let Some(secs) = self.pending_initial_secs.take() {
            self.initial_secs = secs;
        }
        self.remaining_secs = self.initial_secs;
        self.completed = false;
    }
}

/// `H:MM:SS` when at least one hour remains, `MM:SS` otherwise.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_ticks_complete_exactly_once() {
        let mut cd = Countdown::new(5);
        assert!(cd.start());

        let completions = (0..5).filter(|_| cd.tick() == Tick::Completed).count();
        assert_eq!(completions, 1);
        assert_eq!(cd.remaining_secs(), 0);
        assert!(!cd.is_running());

        // A stray sixth tick must not fire again.
        assert_eq!(cd.tick(), Tick::Ignored);
        assert!(cd.is_complete());
    }

    #[test]
    fn start_is_idempotent_while_running() {
        let mut cd = Countdown::new(10);
        assert!(cd.start());
        assert!(!cd.start());
        cd.tick();
        assert!(!cd.start());
        assert_eq!(cd.remaining_secs(), 9);
    }

    #[test]
    fn pause_keeps_remaining_and_ignores_ticks() {
        let mut cd = Countdown::new(10);
        cd.start();
        cd.tick();
        cd.tick();
        assert!(cd.pause());
        assert!(!cd.pause());
        assert_eq!(cd.tick(), Tick::Ignored);
        assert_eq!(cd.remaining_secs(), 8);
        assert_eq!(cd.status_label(), "Paused");
    }

    #[test]
    fn start_from_zero_rearms_completion() {
        let mut cd = Countdown::new(2);
        cd.start();
        cd.tick();
        assert_eq!(cd.tick(), Tick::Completed);
        assert_eq!(cd.status_label(), "Complete");

        assert!(cd.start());
        assert_eq!(cd.remaining_secs(), 2);
        cd.tick();
        assert_eq!(cd.tick(), Tick::Completed);
    }

    #[test]
    fn reset_restores_initial_and_stops() {
        let mut cd = Countdown::new(3);
        cd.start();
        cd.tick();
        cd.reset();
        assert!(!cd.is_running());
        assert_eq!(cd.remaining_secs(), 3);
        assert!(cd.is_pristine());
    }

    #[test]
    fn reconfigure_while_stopped_applies_immediately() {
        let mut cd = Countdown::new(60);
        cd.set_initial_secs(120);
        assert_eq!(cd.initial_secs(), 120);
        assert_eq!(cd.remaining_secs(), 120);
    }

    #[test]
    fn reconfigure_while_running_waits_for_next_run() {
        let mut cd = Countdown::new(60);
        cd.start();
        cd.tick();
        cd.set_initial_secs(5);
        assert_eq!(cd.remaining_secs(), 59);
        assert_eq!(cd.initial_secs(), 60);

        cd.reset();
        assert_eq!(cd.initial_secs(), 5);
        assert_eq!(cd.remaining_secs(), 5);
    }

    #[test]
    fn deferred_duration_applies_on_reset_after_pause() {
        let mut cd = Countdown::new(60);
        cd.start();
        cd.tick();
        cd.pause();
        cd.defer_initial_secs(30);
        assert_eq!(cd.remaining_secs(), 59);

        cd.reset();
        assert_eq!(cd.initial_secs(), 30);
        assert_eq!(cd.remaining_secs(), 30);
    }

    #[test]
    fn zero_length_countdown_completes_on_first_tick() {
        let mut cd = Countdown::new(0);
        cd.start();
        assert_eq!(cd.tick(), Tick::Completed);
        assert_eq!(cd.tick(), Tick::Ignored);
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let mut cd = Countdown::new(4);
        assert_eq!(cd.progress(), 0.0);
        cd.start();
        cd.tick();
        assert!((cd.progress() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn formats_minutes_and_hours() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(59), "00:59");
        assert_eq!(format_duration(25 * 60), "25:00");
        assert_eq!(format_duration(3599), "59:59");
        assert_eq!(format_duration(3600), "1:00:00");
        assert_eq!(format_duration(3 * 3600 + 5 * 60 + 7), "3:05:07");
    }
}
