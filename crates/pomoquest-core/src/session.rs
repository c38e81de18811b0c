//! Game session.
//!
//! The single owner of all mutable game state: the pomodoro cycle, the
//! progression ledger, the task list and the cross-session UI state. The
//! key-value store is injected, so tests and front ends can each build an
//! independent session.
//!
//! State is rehydrated once in [`Session::open`] and written back through
//! the [`Gateway`] after every change to a persisted field.

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::progression::{LevelInfo, ProgressionLedger};
use crate::storage::{Config, Gateway, KvStore, PersistedSnapshot, Screen};
use crate::tasks::{TaskKey, TaskList};
use crate::timer::{CycleController, PhaseDurations};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Character {
    pub name: &'static str,
    pub class: &'static str,
}

/// Playable characters.
pub const ROSTER: &[Character] = &[
    Character {
        name: "Karl",
        class: "Peasant",
    },
    Character {
        name: "Susan",
        class: "Peasant",
    },
];

pub fn find_character(name: &str) -> Option<&'static Character> {
    let name = name.trim();
    ROSTER.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

pub struct Session<S: KvStore> {
    gateway: Gateway<S>,
    snapshot: PersistedSnapshot,
    cycle: CycleController,
    ledger: ProgressionLedger,
    tasks: TaskList,
}

impl<S: KvStore> Session<S> {
    /// Rehydrate from `store`, falling back to `config` defaults for
    /// anything absent.
    pub fn open(store: S, config: &Config) -> Self {
        let gateway = Gateway::new(store);
        let snapshot = match gateway.load() {
            Some(mut snapshot) => {
                snapshot.durations = snapshot.durations.clamped();
                debug!(screen = ?snapshot.screen, "restored snapshot");
                snapshot
            }
            None => PersistedSnapshot {
                muted: gateway.legacy_muted().unwrap_or(false),
                durations: config.durations(),
                ..PersistedSnapshot::default()
            },
        };
        let ledger = ProgressionLedger::from_state(gateway.load_progress(), config.reward_rates());
        let tasks = gateway.load_tasks().unwrap_or_default();
        let cycle = CycleController::new(snapshot.durations, config.timer.long_break_every);

        info!(
            level = ledger.level_info().level,
            coins = ledger.coins(),
            tasks = tasks.len(),
            "session opened"
        );
        Self {
            gateway,
            snapshot,
            cycle,
            ledger,
            tasks,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> &PersistedSnapshot {
        &self.snapshot
    }

    pub fn screen(&self) -> Screen {
        self.snapshot.screen
    }

    pub fn is_muted(&self) -> bool {
        self.snapshot.muted
    }

    pub fn character(&self) -> Option<&str> {
        self.snapshot.character_name.as_deref()
    }

    pub fn has_session(&self) -> bool {
        self.snapshot.has_session
    }

    pub fn durations(&self) -> PhaseDurations {
        self.snapshot.durations
    }

    pub fn cycle(&self) -> &CycleController {
        &self.cycle
    }

    pub fn ledger(&self) -> &ProgressionLedger {
        &self.ledger
    }

    pub fn level_info(&self) -> LevelInfo {
        self.ledger.level_info()
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn store(&self) -> &S {
        self.gateway.store()
    }

    pub fn into_store(self) -> S {
        self.gateway.into_inner()
    }

    // ── Screens ──────────────────────────────────────────────────────

    /// Menu -> character select.
    pub fn begin(&mut self) -> Event {
        self.set_screen(Screen::CharacterSelect)
    }

    /// Pick a character from [`ROSTER`] and enter play.
    ///
    /// # Errors
    /// [`CoreError::UnknownCharacter`] if the name is not on the roster.
    pub fn choose_character(&mut self, name: &str) -> Result<Event> {
        let character =
            find_character(name).ok_or_else(|| CoreError::UnknownCharacter(name.to_string()))?;
        self.snapshot.character_name = Some(character.name.to_string());
        self.snapshot.has_session = true;
        Ok(self.set_screen(Screen::Play))
    }

    /// Re-enter play with the saved character, if there is one.
    pub fn continue_session(&mut self) -> Option<Event> {
        if !self.snapshot.has_session || self.snapshot.character_name.is_none() {
            return None;
        }
        Some(self.set_screen(Screen::Play))
    }

    pub fn back_to_menu(&mut self) -> Event {
        self.cycle.pause();
        self.set_screen(Screen::Menu)
    }

    /// Forget the saved session: the snapshot and task list are cleared and
    /// the cycle starts over. Progression is kept.
    pub fn end_session(&mut self) -> Event {
        self.gateway.clear_tasks();
        self.snapshot = PersistedSnapshot {
            muted: self.snapshot.muted,
            durations: self.snapshot.durations,
            ..PersistedSnapshot::default()
        };
        self.persist();
        self.tasks = TaskList::new();
        self.cycle = CycleController::new(self.snapshot.durations, self.cycle.long_break_every());
        info!("session ended");
        Event::ScreenChanged {
            screen: Screen::Menu,
            at: Utc::now(),
        }
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn toggle_mute(&mut self) -> Event {
        self.snapshot.muted = !self.snapshot.muted;
        self.persist();
        Event::MuteToggled {
            muted: self.snapshot.muted,
            at: Utc::now(),
        }
    }

    /// Store new phase lengths, clamped to the settings bounds. Returns the
    /// values actually applied.
    pub fn set_durations(&mut self, durations: PhaseDurations) -> PhaseDurations {
        let durations = durations.clamped();
        self.cycle.set_durations(durations);
        if self.snapshot.durations != durations {
            self.snapshot.durations = durations;
            self.persist();
        }
        durations
    }

    pub fn set_long_break_every(&mut self, every: u32) {
        self.cycle.set_long_break_every(every);
    }

    // ── Timer ────────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.cycle.start()
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.cycle.pause()
    }

    pub fn reset(&mut self) -> Event {
        self.cycle.reset()
    }

    pub fn tick(&mut self) -> Option<Event> {
        self.cycle.tick()
    }

    pub fn skip(&mut self) -> Event {
        self.cycle.skip()
    }

    pub fn reset_cycle(&mut self) -> Event {
        self.cycle.reset_cycle()
    }

    // ── Tasks & coins ────────────────────────────────────────────────

    /// # Errors
    /// See [`TaskList::add`].
    pub fn add_task(&mut self, title: &str) -> Result<TaskKey> {
        let key = self.tasks.add(title)?;
        self.gateway.save_tasks(&self.tasks);
        Ok(key)
    }

    /// # Errors
    /// See [`TaskList::edit`].
    pub fn edit_task(&mut self, key: TaskKey, title: &str) -> Result<()> {
        self.tasks.edit(key, title)?;
        self.gateway.save_tasks(&self.tasks);
        Ok(())
    }

    /// Check or uncheck a task. Returns `Some(Event::TaskRewarded)` the first
    /// time the task is checked done.
    ///
    /// # Errors
    /// See [`TaskList::toggle`].
    pub fn toggle_task(&mut self, key: TaskKey) -> Result<Option<Event>> {
        let toggled = self.tasks.toggle(key, &mut self.ledger)?;
        self.gateway.save_tasks(&self.tasks);
        let Some(grant) = toggled.reward else {
            return Ok(None);
        };
        self.gateway.save_progress(self.ledger.state());
        debug!(%key, experience = grant.experience, coins = grant.coins, "task rewarded");
        Ok(Some(Event::TaskRewarded {
            key,
            experience: grant.experience,
            coins: grant.coins,
            levels_gained: grant.levels_gained,
            at: Utc::now(),
        }))
    }

    /// # Errors
    /// See [`TaskList::remove`].
    pub fn remove_task(&mut self, key: TaskKey) -> Result<()> {
        self.tasks.remove(key)?;
        self.gateway.save_tasks(&self.tasks);
        Ok(())
    }

    /// Spend coins on a shop item. A declined purchase changes nothing and
    /// is reported as [`Event::InsufficientFunds`].
    pub fn purchase(&mut self, cost: u64) -> Event {
        match self.ledger.spend_coins(cost) {
            Ok(balance) => {
                self.gateway.save_progress(self.ledger.state());
                Event::CoinsSpent {
                    amount: cost,
                    balance,
                    at: Utc::now(),
                }
            }
            Err(crate::error::LedgerError::InsufficientFunds {
                requested,
                available,
            }) => Event::InsufficientFunds {
                requested,
                available,
                at: Utc::now(),
            },
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn set_screen(&mut self, screen: Screen) -> Event {
        self.snapshot.screen = screen;
        self.persist();
        Event::ScreenChanged {
            screen,
            at: Utc::now(),
        }
    }

    fn persist(&mut self) {
        self.gateway.save(&self.snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, COINS_KEY, EXPERIENCE_KEY};

    fn fresh() -> Session<MemoryStore> {
        Session::open(MemoryStore::new(), &Config::default())
    }

    #[test]
    fn opens_on_menu_with_defaults() {
        let session = fresh();
        assert_eq!(session.screen(), Screen::Menu);
        assert!(!session.is_muted());
        assert!(!session.has_session());
        assert_eq!(session.durations(), PhaseDurations::default());
        assert_eq!(session.level_info().level, 1);
    }

    #[test]
    fn choosing_character_enters_play_and_persists() {
        let mut session = fresh();
        session.begin();
        assert_eq!(session.screen(), Screen::CharacterSelect);
        session.choose_character("susan").unwrap();
        assert_eq!(session.character(), Some("Susan"));
        assert!(session.has_session());

        let reopened = Session::open(session.into_store(), &Config::default());
        assert_eq!(reopened.screen(), Screen::Play);
        assert_eq!(reopened.character(), Some("Susan"));
    }

    #[test]
    fn unknown_character_is_rejected() {
        let mut session = fresh();
        assert!(matches!(
            session.choose_character("Merlin"),
            Err(CoreError::UnknownCharacter(_))
        ));
        assert_eq!(session.screen(), Screen::Menu);
    }

    #[test]
    fn continue_requires_a_saved_session() {
        let mut session = fresh();
        assert!(session.continue_session().is_none());
        session.choose_character("Karl").unwrap();
        session.back_to_menu();
        assert!(session.continue_session().is_some());
        assert_eq!(session.screen(), Screen::Play);
    }

    #[test]
    fn task_reward_fires_once_and_persists_counters() {
        let mut session = fresh();
        let key = session.add_task("Chop wood").unwrap();

        let event = session.toggle_task(key).unwrap();
        assert!(matches!(
            event,
            Some(Event::TaskRewarded {
                experience: 10,
                coins: 5,
                ..
            })
        ));
        assert!(session.toggle_task(key).unwrap().is_none());
        assert!(session.toggle_task(key).unwrap().is_none());

        assert_eq!(session.ledger().coins(), 5);
        assert_eq!(session.store().get(EXPERIENCE_KEY).unwrap().as_deref(), Some("10"));
        assert_eq!(session.store().get(COINS_KEY).unwrap().as_deref(), Some("5"));
    }

    #[test]
    fn purchase_declines_without_funds() {
        let mut session = fresh();
        let key = session.add_task("Mend fence").unwrap();
        session.toggle_task(key).unwrap();

        assert!(matches!(
            session.purchase(10),
            Event::InsufficientFunds {
                requested: 10,
                available: 5,
                ..
            }
        ));
        assert!(matches!(
            session.purchase(5),
            Event::CoinsSpent { balance: 0, .. }
        ));
    }

    #[test]
    fn durations_are_clamped_and_saved() {
        let mut session = fresh();
        let applied = session.set_durations(PhaseDurations::new(0, 90, 45));
        assert_eq!(applied, PhaseDurations::new(1, 60, 45));
        assert_eq!(session.cycle().countdown().remaining_secs(), 60);

        let reopened = Session::open(session.into_store(), &Config::default());
        assert_eq!(reopened.durations(), applied);
    }

    #[test]
    fn mute_survives_reopen() {
        let mut session = fresh();
        session.toggle_mute();
        let reopened = Session::open(session.into_store(), &Config::default());
        assert!(reopened.is_muted());
    }

    #[test]
    fn end_session_clears_snapshot_but_keeps_progress() {
        let mut session = fresh();
        session.choose_character("Karl").unwrap();
        session.toggle_mute();
        session.set_durations(PhaseDurations::new(40, 8, 20));
        let key = session.add_task("Sweep the keep").unwrap();
        session.toggle_task(key).unwrap();

        session.end_session();
        assert_eq!(session.screen(), Screen::Menu);
        assert!(session.tasks().is_empty());

        let reopened = Session::open(session.into_store(), &Config::default());
        assert_eq!(reopened.screen(), Screen::Menu);
        assert!(!reopened.has_session());
        assert_eq!(reopened.character(), None);
        assert!(reopened.tasks().is_empty());
        assert!(reopened.is_muted());
        assert_eq!(reopened.durations(), PhaseDurations::new(40, 8, 20));
        assert_eq!(reopened.ledger().coins(), 5);
    }

    #[test]
    fn storage_failures_do_not_interrupt_play() {
        let mut session = Session::open(MemoryStore::unavailable(), &Config::default());
        session.toggle_mute();
        let key = session.add_task("Guard the gate").unwrap();
        assert!(session.toggle_task(key).unwrap().is_some());
        assert_eq!(session.ledger().coins(), 5);
    }
}
