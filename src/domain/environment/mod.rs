//! Institution environment monitoring.

#[allow(clippy::module_inception)]
mod environment;
mod location;

pub use environment::Environment;
pub use location::{validate_location, Location};
