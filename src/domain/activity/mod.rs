//! Physical activity tracking.

#[allow(clippy::module_inception)]
mod activity;
mod levels;

pub use activity::PhysicalActivity;
pub use levels::{validate_levels, ActivityLevelName, PhysicalActivityLevel};
