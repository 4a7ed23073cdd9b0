//! Domain layer - record types, validation and the shared vocabulary.
//!
//! Nothing here performs I/O; storage and the message bus are reached through
//! the traits in `crate::ports`.

pub mod activity;
pub mod body_fat;
pub mod environment;
pub mod foundation;
pub mod log;
pub mod measurement;
pub mod records;
pub mod sleep;
pub mod validation;
