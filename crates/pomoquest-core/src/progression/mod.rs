mod ledger;
mod reward;

pub use ledger::{
    level_info, threshold_for, Grant, LevelInfo, ProgressionLedger, ProgressionState, RewardRates,
    BASE_THRESHOLD, THRESHOLD_STEP,
};
pub use reward::{RewardGuard, RewardOutcome};
