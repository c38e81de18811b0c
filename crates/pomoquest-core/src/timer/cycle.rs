//! Pomodoro cycle controller.
//!
//! Sequences phases over a single [`Countdown`]:
//!
//! ```text
//! Focus -> ShortBreak | LongBreak -> Focus -> ...
//! ```
//!
//! A focus completion increments `completed_breaks`; the break that follows
//! is long when the new count is a multiple of `long_break_every`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::countdown::{Countdown, Tick};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn title(&self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::ShortBreak => "Break",
            Phase::LongBreak => "Long Break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, Phase::Focus)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Phase lengths in whole minutes.
///
/// Field names match the persisted snapshot (`focus`, `brk`, `long`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub focus: u32,
    pub brk: u32,
    pub long: u32,
}

impl PhaseDurations {
    pub const FOCUS_RANGE: (u32, u32) = (1, 180);
    pub const SHORT_BREAK_RANGE: (u32, u32) = (1, 60);
    pub const LONG_BREAK_RANGE: (u32, u32) = (1, 120);

    pub fn new(focus: u32, brk: u32, long: u32) -> Self {
        Self { focus, brk, long }
    }

    /// Clamp each field into the range the settings panel allows.
    pub fn clamped(self) -> Self {
        let clamp = |v: u32, (lo, hi): (u32, u32)| v.clamp(lo, hi);
        Self {
            focus: clamp(self.focus, Self::FOCUS_RANGE),
            brk: clamp(self.brk, Self::SHORT_BREAK_RANGE),
            long: clamp(self.long, Self::LONG_BREAK_RANGE),
        }
    }

    pub fn minutes(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus,
            Phase::ShortBreak => self.brk,
            Phase::LongBreak => self.long,
        }
    }

    pub fn secs(&self, phase: Phase) -> u64 {
        u64::from(self.minutes(phase)).saturating_mul(60)
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            focus: 25,
            brk: 5,
            long: 15,
        }
    }
}

/// Drives the focus/break rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleController {
    countdown: Countdown,
    phase: Phase,
    completed_breaks: u32,
    durations: PhaseDurations,
    long_break_every: u32,
}

impl CycleController {
    pub const DEFAULT_LONG_BREAK_EVERY: u32 = 3;

    /// Starts on an idle Focus countdown.
    pub fn new(durations: PhaseDurations, long_break_every: u32) -> Self {
        Self {
            countdown: Countdown::new(durations.secs(Phase::Focus)),
            phase: Phase::Focus,
            completed_breaks: 0,
            durations,
            long_break_every: long_break_every.max(1),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn title(&self) -> &'static str {
        self.phase.title()
    }

    pub fn completed_breaks(&self) -> u32 {
        self.completed_breaks
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    pub fn long_break_every(&self) -> u32 {
        self.long_break_every
    }

    /// The phase that will follow the current one.
    pub fn upcoming_phase(&self) -> Phase {
        match self.phase {
            Phase::Focus => {
                if self.completed_breaks.saturating_add(1) % self.long_break_every == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Focus,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if !self.countdown.start() {
            return None;
        }
        Some(Event::CountdownStarted {
            phase: self.phase,
            remaining_secs: self.countdown.remaining_secs(),
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.countdown.pause() {
            return None;
        }
        Some(Event::CountdownPaused {
            phase: self.phase,
            remaining_secs: self.countdown.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Reset the current phase's countdown without leaving the phase.
    pub fn reset(&mut self) -> Event {
        self.countdown.reset();
        Event::CountdownReset {
            phase: self.phase,
            remaining_secs: self.countdown.remaining_secs(),
            at: Utc::now(),
        }
    }

    /// Call once per interval. Returns `Some(Event::PhaseCompleted)` when
    /// the phase finishes; the next phase is already running by then.
    pub fn tick(&mut self) -> Option<Event> {
        match self.countdown.tick() {
            Tick::Completed => Some(self.advance()),
            Tick::Advanced(_) | Tick::Ignored => None,
        }
    }

    /// End the current phase early and move on as if it had completed.
    pub fn skip(&mut self) -> Event {
        self.countdown.pause();
        self.advance()
    }

    /// Back to a fresh, running Focus phase with the break counter zeroed.
    pub fn reset_cycle(&mut self) -> Event {
        self.completed_breaks = 0;
        self.load_phase(Phase::Focus);
        debug!("cycle reset");
        Event::CycleReset {
            duration_secs: self.countdown.initial_secs(),
            at: Utc::now(),
        }
    }

    /// Store new phase lengths.
    ///
    /// An idle countdown of the current phase is re-initialized right away.
    /// A started one keeps its run and picks up the new length on its next
    /// re-initialization (`reset()`, or the next time the phase loads).
    pub fn set_durations(&mut self, durations: PhaseDurations) {
        self.durations = durations;
        let secs = durations.secs(self.phase);
        if self.countdown.is_pristine() {
            self.countdown.set_initial_secs(secs);
        } else {
            self.countdown.defer_initial_secs(secs);
        }
    }

    pub fn set_long_break_every(&mut self, every: u32) {
        self.long_break_every = every.max(1);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self) -> Event {
        let completed = self.phase;
        let next = self.upcoming_phase();
        if completed == Phase::Focus {
            self.completed_breaks = self.completed_breaks.saturating_add(1);
        }
        self.load_phase(next);
        debug!(%completed, %next, completed_breaks = self.completed_breaks, "phase advanced");
        Event::PhaseCompleted {
            completed,
            next,
            title: next.title().to_string(),
            duration_secs: self.countdown.initial_secs(),
            completed_breaks: self.completed_breaks,
            at: Utc::now(),
        }
    }

    fn load_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.countdown.pause();
        self.countdown.set_initial_secs(self.durations.secs(phase));
        self.countdown.start();
    }
}

impl Default for CycleController {
    fn default() -> Self {
        Self::new(PhaseDurations::default(), Self::DEFAULT_LONG_BREAK_EVERY)
    }
}
