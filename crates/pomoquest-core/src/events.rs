use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Screen;
use crate::tasks::TaskKey;
use crate::timer::Phase;

/// Every state change the UI may react to produces an Event.
/// Operations return them instead of invoking callbacks, so the front end
/// decides how to present each one (readout, coin pop, toast).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CountdownStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    CountdownPaused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    CountdownReset {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase countdown reached zero (or was skipped) and the next phase
    /// has been loaded and auto-started.
    PhaseCompleted {
        completed: Phase,
        next: Phase,
        /// Display title of the next phase.
        title: String,
        duration_secs: u64,
        completed_breaks: u32,
        at: DateTime<Utc>,
    },
    CycleReset {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TaskRewarded {
        key: TaskKey,
        experience: u64,
        coins: u64,
        levels_gained: u32,
        at: DateTime<Utc>,
    },
    CoinsSpent {
        amount: u64,
        balance: u64,
        at: DateTime<Utc>,
    },
    InsufficientFunds {
        requested: u64,
        available: u64,
        at: DateTime<Utc>,
    },
    ScreenChanged {
        screen: Screen,
        at: DateTime<Utc>,
    },
    MuteToggled {
        muted: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Event name without payload, used for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::CountdownStarted { .. } => "countdown_started",
            Event::CountdownPaused { .. } => "countdown_paused",
            Event::CountdownReset { .. } => "countdown_reset",
            Event::PhaseCompleted { .. } => "phase_completed",
            Event::CycleReset { .. } => "cycle_reset",
            Event::TaskRewarded { .. } => "task_rewarded",
            Event::CoinsSpent { .. } => "coins_spent",
            Event::InsufficientFunds { .. } => "insufficient_funds",
            Event::ScreenChanged { .. } => "screen_changed",
            Event::MuteToggled { .. } => "mute_toggled",
        }
    }
}
