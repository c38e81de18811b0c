mod config;
mod database;
mod gateway;
mod kv;

pub use config::{Config, RewardsConfig, TimerConfig};
pub use database::{Database, DATABASE_FILE};
pub use gateway::{
    Gateway, PersistedSnapshot, Screen, COINS_KEY, EXPERIENCE_KEY, LEGACY_MUTE_KEY, SNAPSHOT_KEY,
    SNAPSHOT_VERSION, TASKS_KEY,
};
pub use kv::{KvStore, MemoryStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `POMOQUEST_DATA_DIR` wins when set. Otherwise `~/.config/pomoquest[-dev]/`
/// based on `POMOQUEST_ENV` (set it to `dev` for a development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("POMOQUEST_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOQUEST_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomoquest-dev")
            } else {
                base_dir.join("pomoquest")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
