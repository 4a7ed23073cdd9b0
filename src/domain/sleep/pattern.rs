//! Sleep pattern value objects and their validators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Field, ValidationError};
use crate::domain::validation::{
    validate_enum_membership, validate_non_negative, validate_well_formed, DeclaredEnum,
    RequiredFields,
};

/// How a tracker classified the night.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepType {
    Classic,
    Stages,
}

impl DeclaredEnum for SleepType {
    const ALL: &'static [Self] = &[SleepType::Classic, SleepType::Stages];

    fn as_str(&self) -> &'static str {
        match self {
            SleepType::Classic => "classic",
            SleepType::Stages => "stages",
        }
    }
}

/// Phases reported by `classic` sleep tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassicPhase {
    Asleep,
    Restless,
    Awake,
}

impl DeclaredEnum for ClassicPhase {
    const ALL: &'static [Self] = &[
        ClassicPhase::Asleep,
        ClassicPhase::Restless,
        ClassicPhase::Awake,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ClassicPhase::Asleep => "asleep",
            ClassicPhase::Restless => "restless",
            ClassicPhase::Awake => "awake",
        }
    }
}

/// Phases reported by `stages` sleep tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagesPhase {
    Deep,
    Light,
    Rem,
    Awake,
}

impl DeclaredEnum for StagesPhase {
    const ALL: &'static [Self] = &[
        StagesPhase::Deep,
        StagesPhase::Light,
        StagesPhase::Rem,
        StagesPhase::Awake,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            StagesPhase::Deep => "deep",
            StagesPhase::Light => "light",
            StagesPhase::Rem => "rem",
            StagesPhase::Awake => "awake",
        }
    }
}

/// One contiguous phase within a night.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepPatternDataSetEntry {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub start_time: Field<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    /// Milliseconds.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub duration: Field<i64>,
}

impl SleepPatternDataSetEntry {
    pub fn new(start_time: DateTime<Utc>, name: &str, duration: i64) -> Self {
        Self {
            start_time: Field::Present(start_time),
            name: Field::Present(name.to_string()),
            duration: Field::Present(duration),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepPattern {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub data_set: Field<Vec<SleepPatternDataSetEntry>>,
}

impl SleepPattern {
    pub fn new(data_set: Vec<SleepPatternDataSetEntry>) -> Self {
        Self {
            data_set: Field::Present(data_set),
        }
    }
}

const PATTERN_MESSAGE: &str = "Pattern are not in a format that is supported...";
const DATASET_MESSAGE: &str = "Dataset are not in a format that is supported!";

/// Validates one data-set entry; allowed phase names depend on `sleep_type`.
pub fn validate_data_set_entry(
    entry: &SleepPatternDataSetEntry,
    sleep_type: SleepType,
) -> Result<(), ValidationError> {
    let mut required = RequiredFields::new();
    required
        .check(&entry.start_time, "data_set start_time")
        .check(&entry.name, "data_set name")
        .check(&entry.duration, "data_set duration");
    required.finish_with(DATASET_MESSAGE, "Validation of the sleep pattern dataset failed")?;

    validate_well_formed(&entry.start_time, "data_set start_time")?;
    validate_well_formed(&entry.name, "data_set name")?;
    validate_well_formed(&entry.duration, "data_set duration")?;

    if let Some(duration) = entry.duration.value() {
        validate_non_negative(
            *duration,
            "Some (or several) duration field of sleep pattern is invalid...",
            "Sleep Pattern dataset",
        )?;
    }

    if let Some(name) = entry.name.value() {
        let subject = "sleep pattern name";
        let label = "The names of the allowed patterns are";
        match sleep_type {
            SleepType::Classic => {
                validate_enum_membership::<ClassicPhase>(name, subject, label)?;
            }
            SleepType::Stages => {
                validate_enum_membership::<StagesPhase>(name, subject, label)?;
            }
        }
    }
    Ok(())
}

/// Validates the pattern, stopping at the first invalid entry.
pub fn validate_sleep_pattern(
    pattern: &SleepPattern,
    sleep_type: SleepType,
) -> Result<(), ValidationError> {
    let mut required = RequiredFields::new();
    required.check(&pattern.data_set, "data_set");
    required.finish_with(PATTERN_MESSAGE, "Validation of the standard of sleep failed")?;

    validate_well_formed(&pattern.data_set, "pattern.data_set")?;

    let data_set = match pattern.data_set.value() {
        Some(data_set) => data_set,
        None => return Ok(()),
    };
    if data_set.is_empty() {
        return Err(ValidationError::invalid_format(
            DATASET_MESSAGE,
            "The data_set collection must not be empty!",
        ));
    }
    data_set
        .iter()
        .try_for_each(|entry| validate_data_set_entry(entry, sleep_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 8, 18, 1, 40, 30).unwrap()
    }

    fn entry(name: &str, duration: i64) -> SleepPatternDataSetEntry {
        SleepPatternDataSetEntry::new(t0(), name, duration)
    }

    #[test]
    fn classic_pattern_with_classic_phases_passes() {
        let pattern = SleepPattern::new(vec![
            entry("asleep", 60_000),
            entry("restless", 0),
            entry("awake", 1_000),
        ]);
        assert!(validate_sleep_pattern(&pattern, SleepType::Classic).is_ok());
    }

    #[test]
    fn phase_names_depend_on_sleep_type() {
        assert!(validate_data_set_entry(&entry("deep", 1), SleepType::Stages).is_ok());
        assert!(validate_data_set_entry(&entry("deep", 1), SleepType::Classic).is_err());
        assert!(validate_data_set_entry(&entry("restless", 1), SleepType::Classic).is_ok());
        assert!(validate_data_set_entry(&entry("restless", 1), SleepType::Stages).is_err());
    }

    #[test]
    fn unknown_classic_phase_lists_classic_names() {
        let err = validate_data_set_entry(&entry("restlesss", 1), SleepType::Classic).unwrap_err();
        assert_eq!(
            err.message(),
            "The sleep pattern name provided \"restlesss\" is not supported..."
        );
        assert_eq!(
            err.description(),
            "The names of the allowed patterns are: asleep, restless, awake."
        );
    }

    #[test]
    fn unknown_stages_phase_lists_stages_names() {
        let err = validate_data_set_entry(&entry("deeps", 1), SleepType::Stages).unwrap_err();
        assert_eq!(
            err.description(),
            "The names of the allowed patterns are: deep, light, rem, awake."
        );
    }

    #[test]
    fn entry_missing_everything_names_all_fields() {
        let err = validate_data_set_entry(&SleepPatternDataSetEntry::default(), SleepType::Classic)
            .unwrap_err();
        assert_eq!(err.message(), "Dataset are not in a format that is supported!");
        assert_eq!(
            err.description(),
            "Validation of the sleep pattern dataset failed: \
             data_set start_time, data_set name, data_set duration is required!"
        );
    }

    #[test]
    fn negative_entry_duration_fails() {
        let err = validate_data_set_entry(&entry("asleep", -1), SleepType::Classic).unwrap_err();
        assert_eq!(
            err.message(),
            "Some (or several) duration field of sleep pattern is invalid..."
        );
        assert_eq!(
            err.description(),
            "Sleep Pattern dataset validation failed: The value provided has a negative value!"
        );
    }

    #[test]
    fn missing_data_set_is_required_error() {
        let err = validate_sleep_pattern(&SleepPattern::default(), SleepType::Classic).unwrap_err();
        assert!(err.is_required_fields());
        assert_eq!(err.message(), "Pattern are not in a format that is supported...");
        assert_eq!(
            err.description(),
            "Validation of the standard of sleep failed: data_set is required!"
        );
    }

    #[test]
    fn empty_data_set_is_a_distinct_error() {
        let err =
            validate_sleep_pattern(&SleepPattern::new(vec![]), SleepType::Classic).unwrap_err();
        assert!(!err.is_required_fields());
        assert_eq!(err.description(), "The data_set collection must not be empty!");
    }

    #[test]
    fn first_invalid_entry_wins() {
        let pattern =
            SleepPattern::new(vec![entry("asleep", 1), entry("asleep", -5), entry("bogus", 1)]);
        let err = validate_sleep_pattern(&pattern, SleepType::Classic).unwrap_err();
        assert!(err.description().contains("negative value"));
    }

    #[test]
    fn data_set_entries_decode_from_json() {
        let pattern: SleepPattern = serde_json::from_value(json!({
            "data_set": [
                { "start_time": "2018-08-18T01:40:30Z", "name": "asleep", "duration": 60000 }
            ]
        }))
        .unwrap();
        assert!(validate_sleep_pattern(&pattern, SleepType::Classic).is_ok());
    }
}
