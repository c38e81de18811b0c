//! Experience and coin ledger.
//!
//! Experience is a lifetime counter that never decreases; the level is
//! derived from it on demand. Coins go up by the task reward and down only
//! through [`ProgressionLedger::spend_coins`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LedgerError;

/// Experience needed to leave level 1.
pub const BASE_THRESHOLD: u64 = 50;
/// Extra experience each further level demands.
pub const THRESHOLD_STEP: u64 = 25;

/// Experience required to advance from `level` to `level + 1`.
pub fn threshold_for(level: u32) -> u64 {
    BASE_THRESHOLD.saturating_add(u64::from(level.saturating_sub(1)).saturating_mul(THRESHOLD_STEP))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u32,
    pub experience_into_level: u64,
    pub experience_to_next_level: u64,
}

impl LevelInfo {
    /// Fill of the level bar, 0.0 ..= 100.0.
    pub fn progress_pct(&self) -> f64 {
        // Thresholds start at BASE_THRESHOLD, so the divisor is never zero.
        let pct = self.experience_into_level as f64 / self.experience_to_next_level as f64 * 100.0;
        pct.clamp(0.0, 100.0)
    }
}

/// Derive the level from lifetime experience.
pub fn level_info(lifetime_experience: u64) -> LevelInfo {
    let mut level = 1u32;
    let mut left = lifetime_experience;
    let mut threshold = threshold_for(level);
    while left >= threshold {
        left -= threshold;
        level = level.saturating_add(1);
        threshold = threshold_for(level);
    }
    LevelInfo {
        level,
        experience_into_level: left,
        experience_to_next_level: threshold,
    }
}

/// Amounts credited per completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRates {
    pub experience_per_task: u64,
    pub coins_per_task: u64,
}

impl Default for RewardRates {
    fn default() -> Self {
        Self {
            experience_per_task: 10,
            coins_per_task: 5,
        }
    }
}

/// Persisted progression counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressionState {
    pub lifetime_experience: u64,
    pub coins: u64,
}

/// What one `award_task()` credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub experience: u64,
    pub coins: u64,
    pub levels_gained: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionLedger {
    state: ProgressionState,
    rates: RewardRates,
}

impl ProgressionLedger {
    pub fn new(rates: RewardRates) -> Self {
        Self::from_state(ProgressionState::default(), rates)
    }

    pub fn from_state(state: ProgressionState, rates: RewardRates) -> Self {
        Self { state, rates }
    }

    pub fn state(&self) -> ProgressionState {
        self.state
    }

    pub fn rates(&self) -> RewardRates {
        self.rates
    }

    pub fn lifetime_experience(&self) -> u64 {
        self.state.lifetime_experience
    }

    pub fn coins(&self) -> u64 {
        self.state.coins
    }

    pub fn level_info(&self) -> LevelInfo {
        level_info(self.state.lifetime_experience)
    }

    /// Credit one completed task.
    ///
    /// Unconditional: callers go through the reward guard to keep this at
    /// most once per task.
    pub fn award_task(&mut self) -> Grant {
        let before = self.level_info().level;
        self.state.lifetime_experience = self
            .state
            .lifetime_experience
            .saturating_add(self.rates.experience_per_task);
        self.state.coins = self.state.coins.saturating_add(self.rates.coins_per_task);
        let after = self.level_info().level;
        if after > before {
            debug!(level = after, "level up");
        }
        Grant {
            experience: self.rates.experience_per_task,
            coins: self.rates.coins_per_task,
            levels_gained: after - before,
        }
    }

    /// Deduct `amount` coins, returning the new balance.
    ///
    /// # Errors
    /// Returns [`LedgerError::InsufficientFunds`] without touching the
    /// balance when `amount` exceeds it.
    pub fn spend_coins(&mut self, amount: u64) -> Result<u64, LedgerError> {
        if amount > self.state.coins {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: self.state.coins,
            });
        }
        self.state.coins -= amount;
        Ok(self.state.coins)
    }
}

impl Default for ProgressionLedger {
    fn default() -> Self {
        Self::new(RewardRates::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fresh_player_is_level_one() {
        let info = level_info(0);
        assert_eq!(info.level, 1);
        assert_eq!(info.experience_into_level, 0);
        assert_eq!(info.experience_to_next_level, 50);
        assert_eq!(info.progress_pct(), 0.0);
    }

    #[test]
    fn thresholds_grow_by_step() {
        assert_eq!(threshold_for(1), 50);
        assert_eq!(threshold_for(2), 75);
        assert_eq!(threshold_for(3), 100);
    }

    #[test]
    fn exact_threshold_levels_up() {
        assert_eq!(level_info(49).level, 1);
        let info = level_info(50);
        assert_eq!(info.level, 2);
        assert_eq!(info.experience_into_level, 0);
        // 50 + 75 = 125 reaches level 3.
        assert_eq!(level_info(125).level, 3);
    }

    #[test]
    fn six_tasks_reach_level_two() {
        let mut ledger = ProgressionLedger::default();
        let gained: u32 = (0..6).map(|_| ledger.award_task().levels_gained).sum();

        assert_eq!(ledger.lifetime_experience(), 60);
        assert_eq!(ledger.coins(), 30);
        assert_eq!(gained, 1);

        let info = ledger.level_info();
        assert_eq!(info.level, 2);
        assert_eq!(info.experience_into_level, 10);
        assert_eq!(info.experience_to_next_level, 75);
    }

    #[test]
    fn overspend_is_declined_without_mutation() {
        let mut ledger = ProgressionLedger::from_state(
            ProgressionState {
                lifetime_experience: 0,
                coins: 100,
            },
            RewardRates::default(),
        );
        assert_eq!(
            ledger.spend_coins(150),
            Err(LedgerError::InsufficientFunds {
                requested: 150,
                available: 100
            })
        );
        assert_eq!(ledger.coins(), 100);

        assert_eq!(ledger.spend_coins(50), Ok(50));
        assert_eq!(ledger.coins(), 50);
        assert_eq!(ledger.spend_coins(50), Ok(0));
    }

    #[test]
    fn custom_rates_apply() {
        let mut ledger = ProgressionLedger::new(RewardRates {
            experience_per_task: 50,
            coins_per_task: 1,
        });
        let grant = ledger.award_task();
        assert_eq!(grant.experience, 50);
        assert_eq!(grant.coins, 1);
        assert_eq!(grant.levels_gained, 1);
    }

    proptest! {
        #[test]
        fn level_info_stays_normalized(exp in 0u64..5_000_000) {
            let info = level_info(exp);
            prop_assert!(info.level >= 1);
            prop_assert!(info.experience_into_level < info.experience_to_next_level);
            prop_assert_eq!(info.experience_to_next_level, threshold_for(info.level));
            prop_assert!((0.0..=100.0).contains(&info.progress_pct()));
        }

        #[test]
        fn level_is_monotonic(a in 0u64..5_000_000, b in 0u64..5_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(level_info(lo).level <= level_info(hi).level);
        }
    }
}
