//! Persistence gateway.
//!
//! Best-effort persistence: writes never fail from the caller's point of
//! view (storage errors are logged and dropped), and reads degrade to "no
//! saved state" on anything absent, malformed or from another version.
//! A snapshot is applied whole or not at all.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::kv::KvStore;
use crate::progression::ProgressionState;
use crate::tasks::TaskList;
use crate::timer::PhaseDurations;

pub const SNAPSHOT_KEY: &str = "mp_state_v1";
pub const SNAPSHOT_VERSION: u32 = 1;
pub const EXPERIENCE_KEY: &str = "playerExp";
pub const COINS_KEY: &str = "playerCoins";
pub const TASKS_KEY: &str = "mp_tasks_v1";
/// Read-only: older builds kept the mute flag here as "1"/"0".
pub const LEGACY_MUTE_KEY: &str = "bgmMuted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    #[default]
    Menu,
    CharacterSelect,
    Play,
}

/// Cross-session UI state, version 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub version: u32,
    pub screen: Screen,
    pub muted: bool,
    pub durations: PhaseDurations,
    pub character_name: Option<String>,
    pub has_session: bool,
}

impl Default for PersistedSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            screen: Screen::Menu,
            muted: false,
            durations: PhaseDurations::default(),
            character_name: None,
            has_session: false,
        }
    }
}

pub struct Gateway<S: KvStore> {
    store: S,
}

impl<S: KvStore> Gateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    // ── Snapshot ─────────────────────────────────────────────────────

    /// Overwrite the stored snapshot.
    pub fn save(&mut self, snapshot: &PersistedSnapshot) {
        match serde_json::to_string(snapshot) {
            Ok(json) => self.write(SNAPSHOT_KEY, &json),
            Err(e) => warn!(error = %e, "snapshot not serializable, skipping save"),
        }
    }

    /// The stored snapshot, or `None` if there is no usable one.
    pub fn load(&self) -> Option<PersistedSnapshot> {
        let raw = self.read(SNAPSHOT_KEY)?;
        let snapshot: PersistedSnapshot = match serde_json::from_str(&raw) {
            Ok(s) => s,
            Err(e) => {
                debug!(error = %e, "discarding malformed snapshot");
                return None;
            }
        };
        if snapshot.version != SNAPSHOT_VERSION {
            debug!(version = snapshot.version, "discarding snapshot from another version");
            return None;
        }
        Some(snapshot)
    }

    pub fn clear(&mut self) {
        if let Err(e) = self.store.remove(SNAPSHOT_KEY) {
            warn!(error = %e, key = SNAPSHOT_KEY, "failed to clear snapshot");
        }
    }

    /// Mute flag written by older builds, consulted only when no snapshot
    /// could be loaded.
    pub fn legacy_muted(&self) -> Option<bool> {
        self.read(LEGACY_MUTE_KEY).map(|raw| raw == "1")
    }

    // ── Progression ──────────────────────────────────────────────────

    pub fn save_progress(&mut self, progress: ProgressionState) {
        self.write(EXPERIENCE_KEY, &progress.lifetime_experience.to_string());
        self.write(COINS_KEY, &progress.coins.to_string());
    }

    /// Each counter is read independently; a missing or malformed one is 0.
    pub fn load_progress(&self) -> ProgressionState {
        ProgressionState {
            lifetime_experience: self.read_counter(EXPERIENCE_KEY),
            coins: self.read_counter(COINS_KEY),
        }
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn save_tasks(&mut self, tasks: &TaskList) {
        match serde_json::to_string(tasks) {
            Ok(json) => self.write(TASKS_KEY, &json),
            Err(e) => warn!(error = %e, "task list not serializable, skipping save"),
        }
    }

    pub fn load_tasks(&self) -> Option<TaskList> {
        let raw = self.read(TASKS_KEY)?;
        serde_json::from_str(&raw)
            .map_err(|e| debug!(error = %e, "discarding malformed task list"))
            .ok()
    }

    pub fn clear_tasks(&mut self) {
        if let Err(e) = self.store.remove(TASKS_KEY) {
            warn!(error = %e, key = TASKS_KEY, "failed to clear task list");
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, key, "storage read failed");
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            warn!(error = %e, key, "storage write failed");
        }
    }

    fn read_counter(&self, key: &str) -> u64 {
        self.read(key)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0)
    }
}
