//! TOML-based application configuration.
//!
//! Stores the settings the core consumes:
//! - Phase lengths and the long-break cadence
//! - Tick interval of the countdown driver
//! - Experience and coins granted per completed task
//!
//! Configuration is stored at `<data_dir>/config.toml`. Out-of-range numbers
//! are clamped on load and on `set`, never rejected.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::progression::RewardRates;
use crate::timer::{CycleController, PhaseDurations};

/// Timer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    #[serde(default = "default_long_break_every")]
    pub long_break_every: u32,
    /// Countdown tick interval in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

/// Reward configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardsConfig {
    #[serde(default = "default_experience_per_task")]
    pub experience_per_task: u64,
    #[serde(default = "default_coins_per_task")]
    pub coins_per_task: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub rewards: RewardsConfig,
}

// Default functions
fn default_focus_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_long_break_every() -> u32 {
    CycleController::DEFAULT_LONG_BREAK_EVERY
}
fn default_tick_ms() -> u64 {
    1000
}
fn default_experience_per_task() -> u64 {
    10
}
fn default_coins_per_task() -> u64 {
    5
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            long_break_every: default_long_break_every(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            experience_per_task: default_experience_per_task(),
            coins_per_task: default_coins_per_task(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Every settable value is a non-negative integer. Fractions are
    /// truncated, negatives become 0, non-finite input falls back to the
    /// default for that key.
    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        defaults: &serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let (parent, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };

        let mut current = &mut *root;
        if let Some(parent) = parent {
            for part in parent.split('.') {
                current = current.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let obj = current.as_object_mut().ok_or_else(unknown)?;
        if !obj.get(leaf).is_some_and(serde_json::Value::is_number) {
            return Err(unknown());
        }

        let parsed: f64 = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("cannot parse '{value}' as number"),
        })?;
        let new_value = if parsed.is_finite() {
            let whole = parsed.max(0.0).trunc() as u64;
            serde_json::Value::from(whole.min(Self::leaf_ceiling(key)))
        } else {
            Self::get_json_value_by_path(defaults, key)
                .cloned()
                .ok_or_else(unknown)?
        };
        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    /// Largest value the field behind `key` can hold. u64 leaves stop at
    /// `i64::MAX`, the largest integer TOML can write back.
    fn leaf_ceiling(key: &str) -> u64 {
        const U32_KEYS: &[&str] = &[
            "timer.focus_minutes",
            "timer.short_break_minutes",
            "timer.long_break_minutes",
            "timer.long_break_every",
        ];
        if U32_KEYS.contains(&key) {
            u64::from(u32::MAX)
        } else {
            i64::MAX.unsigned_abs()
        }
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg.normalized())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// See [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load, returning defaults on any error. Never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value in memory by dot-separated key. The result is clamped.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is not a number.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |e: serde_json::Error| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        };
        let mut json = serde_json::to_value(&*self).map_err(invalid)?;
        let defaults = serde_json::to_value(Self::default()).map_err(invalid)?;
        Self::set_json_value_by_path(&mut json, &defaults, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(invalid)?;
        *self = updated.normalized();
        Ok(())
    }

    /// Clamp every field into its valid range.
    pub fn normalized(mut self) -> Self {
        let d = self.durations();
        self.timer.focus_minutes = d.focus;
        self.timer.short_break_minutes = d.brk;
        self.timer.long_break_minutes = d.long;
        self.timer.long_break_every = self.timer.long_break_every.max(1);
        self.timer.tick_ms = self.timer.tick_ms.max(1);
        self
    }

    pub fn durations(&self) -> PhaseDurations {
        PhaseDurations::new(
            self.timer.focus_minutes,
            self.timer.short_break_minutes,
            self.timer.long_break_minutes,
        )
        .clamped()
    }

    pub fn reward_rates(&self) -> RewardRates {
        RewardRates {
            experience_per_task: self.rewards.experience_per_task,
            coins_per_task: self.rewards.coins_per_task,
        }
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timer.tick_ms.max(1))
    }
}
