mod countdown;
mod cycle;
mod ticker;

pub use countdown::{format_duration, Countdown, Tick};
pub use cycle::{CycleController, Phase, PhaseDurations};
pub use ticker::{TickHandle, Ticker, DEFAULT_TICK};
