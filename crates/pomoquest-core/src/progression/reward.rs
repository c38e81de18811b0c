//! At-most-once task rewards.
//!
//! The UI can report the same completion more than once (a checkbox toggled
//! off and on again, a duplicated click). The guard remembers every key it
//! has paid out for and never forgets one; keys are drawn from a counter
//! that is never rewound, so the set only grows with the task list.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ledger::{Grant, ProgressionLedger};
use crate::tasks::TaskKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardOutcome {
    Rewarded(Grant),
    AlreadyRewarded,
}

impl RewardOutcome {
    pub fn grant(&self) -> Option<Grant> {
        match self {
            RewardOutcome::Rewarded(grant) => Some(*grant),
            RewardOutcome::AlreadyRewarded => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardGuard<K: Ord = TaskKey> {
    rewarded: BTreeSet<K>,
}

impl<K: Ord> RewardGuard<K> {
    pub fn new() -> Self {
        Self {
            rewarded: BTreeSet::new(),
        }
    }

    /// Pay out for `key` unless it has been paid before.
    pub fn try_reward(&mut self, key: K, ledger: &mut ProgressionLedger) -> RewardOutcome {
        if !self.rewarded.insert(key) {
            return RewardOutcome::AlreadyRewarded;
        }
        RewardOutcome::Rewarded(ledger.award_task())
    }

    pub fn is_rewarded(&self, key: &K) -> bool {
        self.rewarded.contains(key)
    }

    pub fn len(&self) -> usize {
        self.rewarded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewarded.is_empty()
    }
}

impl<K: Ord> Default for RewardGuard<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_reward_for_same_key_is_refused() {
        let mut ledger = ProgressionLedger::default();
        let mut guard: RewardGuard<&str> = RewardGuard::new();

        assert!(matches!(
            guard.try_reward("task-1", &mut ledger),
            RewardOutcome::Rewarded(_)
        ));
        assert_eq!(
            guard.try_reward("task-1", &mut ledger),
            RewardOutcome::AlreadyRewarded
        );

        assert_eq!(ledger.lifetime_experience(), 10);
        assert_eq!(ledger.coins(), 5);
        assert_eq!(guard.len(), 1);
    }

    #[test]
    fn distinct_keys_each_pay_once() {
        let mut ledger = ProgressionLedger::default();
        let mut guard = RewardGuard::new();
        for n in 0..3 {
            assert!(guard.try_reward(TaskKey(n), &mut ledger).grant().is_some());
        }
        assert!(guard.is_rewarded(&TaskKey(2)));
        assert!(!guard.is_rewarded(&TaskKey(3)));
        assert_eq!(ledger.coins(), 15);
    }
}
