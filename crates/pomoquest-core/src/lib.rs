//! # Pomoquest Core Library
//!
//! Core logic for Pomoquest, a medieval-themed Pomodoro timer with a small
//! role-playing layer: finishing tasks earns experience and coins, coins buy
//! items in the shop. Front ends (the bundled CLI, or a web view) stay thin
//! and only render the state and events exposed here.
//!
//! ## Architecture
//!
//! - **Timer**: a tick-driven countdown, the focus/break cycle on top of it,
//!   and a cancellable fixed-interval tick source
//! - **Progression**: level curve, coin ledger and the at-most-once reward
//!   guard
//! - **Tasks**: the session task list whose completions pay rewards
//! - **Storage**: key-value persistence of a versioned snapshot (SQLite or
//!   in-memory) and TOML configuration
//!
//! ## Key Components
//!
//! - [`Session`]: owns all game state, built over an injected [`KvStore`]
//! - [`CycleController`]: pomodoro phase state machine
//! - [`ProgressionLedger`]: experience, levels and coins
//! - [`Gateway`]: best-effort snapshot persistence

pub mod error;
pub mod events;
pub mod progression;
pub mod session;
pub mod storage;
pub mod tasks;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, LedgerError, TaskError};
pub use events::Event;
pub use progression::{level_info, LevelInfo, ProgressionLedger, RewardGuard, RewardOutcome, RewardRates};
pub use session::{Character, Session, ROSTER};
pub use storage::{Config, Database, Gateway, KvStore, MemoryStore, PersistedSnapshot, Screen};
pub use tasks::{Task, TaskKey, TaskList};
pub use timer::{format_duration, Countdown, CycleController, Phase, PhaseDurations, Ticker};
