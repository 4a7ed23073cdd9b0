//! Activity intensity levels.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Field, ValidationError, REQUIRED_FIELDS_MESSAGE};
use crate::domain::validation::{
    validate_enum_membership, validate_non_negative, validate_well_formed, DeclaredEnum,
    RequiredFields,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevelName {
    Sedentary,
    Lightly,
    Fairly,
    Very,
}

impl DeclaredEnum for ActivityLevelName {
    const ALL: &'static [Self] = &[
        ActivityLevelName::Sedentary,
        ActivityLevelName::Lightly,
        ActivityLevelName::Fairly,
        ActivityLevelName::Very,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ActivityLevelName::Sedentary => "sedentary",
            ActivityLevelName::Lightly => "lightly",
            ActivityLevelName::Fairly => "fairly",
            ActivityLevelName::Very => "very",
        }
    }
}

/// Time spent at one intensity during an activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalActivityLevel {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    /// Milliseconds.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub duration: Field<i64>,
}

impl PhysicalActivityLevel {
    pub fn new(name: ActivityLevelName, duration: i64) -> Self {
        Self {
            name: Field::Present(name.as_str().to_string()),
            duration: Field::Present(duration),
        }
    }
}

fn coverage_error() -> ValidationError {
    ValidationError::invalid_fields(
        "Level are not in a format that is supported!",
        format!(
            "Must have values for the following levels: {}.",
            ActivityLevelName::allowed()
        ),
    )
}

/// Validates the levels array.
///
/// Checks, in order: non-empty; per entry, a known name and a non-negative
/// duration (missing fields are collected); the collected missing fields;
/// exactly one entry per level name.
pub fn validate_levels(levels: &[PhysicalActivityLevel]) -> Result<(), ValidationError> {
    if levels.is_empty() {
        return Err(coverage_error());
    }

    let mut required = RequiredFields::new();
    let mut seen = Vec::with_capacity(levels.len());
    for level in levels {
        required.check(&level.name, "levels name");
        validate_well_formed(&level.name, "levels name")?;
        if let Some(name) = level.name.value() {
            seen.push(validate_enum_membership::<ActivityLevelName>(
                name,
                "name of level",
                "The names of the allowed levels are",
            )?);
        }

        required.check(&level.duration, "levels duration");
        validate_well_formed(&level.duration, "levels duration")?;
        if let Some(duration) = level.duration.value() {
            validate_non_negative(
                *duration,
                "Some (or several) duration field of levels array is invalid...",
                "Physical Activity Level",
            )?;
        }
    }
    required.finish_with(REQUIRED_FIELDS_MESSAGE, "Physical Activity Level validation failed")?;

    let covered = ActivityLevelName::ALL
        .iter()
        .all(|name| seen.iter().filter(|s| *s == name).count() == 1);
    if !covered {
        return Err(coverage_error());
    }
    Ok(())
}
