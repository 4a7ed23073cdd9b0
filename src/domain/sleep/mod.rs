//! Sleep tracking.

mod pattern;
#[allow(clippy::module_inception)]
mod sleep;

pub use pattern::{
    validate_data_set_entry, validate_sleep_pattern, ClassicPhase, SleepPattern,
    SleepPatternDataSetEntry, SleepType, StagesPhase,
};
pub use sleep::Sleep;
