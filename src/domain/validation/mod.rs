//! Reusable validation building blocks.
//!
//! Record validators compose these checks in a fixed order; see the
//! `validate_create`/`validate_update` functions of each record kind.

mod primitives;
mod time_range;

pub use primitives::{
    validate_enum_membership, validate_enum_membership_ignore_case, validate_identifier_field,
    validate_identifier_format, validate_non_negative, validate_well_formed, DeclaredEnum,
    RequiredFields,
};
pub use time_range::validate_time_range;
