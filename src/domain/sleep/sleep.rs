//! Sleep record and its create/update validators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Field, RecordId, ValidationError};
use crate::domain::records::{RecordFilter, RecordKind, TrackedRecord};
use crate::domain::validation::{
    validate_enum_membership, validate_identifier_field, validate_time_range,
    validate_well_formed, RequiredFields,
};

use super::pattern::{validate_sleep_pattern, SleepPattern, SleepType};

const RESOURCE: &str = "Sleep";

/// One night (or nap) of a child's sleep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sleep {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub id: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub start_time: Field<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub end_time: Field<DateTime<Utc>>,
    /// Milliseconds; must equal `end_time - start_time`.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub duration: Field<i64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub pattern: Field<SleepPattern>,
    #[serde(rename = "type", skip_serializing_if = "Field::is_absent")]
    pub sleep_type: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub child_id: Field<String>,
}

impl TrackedRecord for Sleep {
    const KIND: RecordKind = RecordKind {
        label: "Sleep",
        collection: "sleep",
        event_stem: "Sleep",
        routing_prefix: "sleep",
        payload_key: "sleep",
        subject_field: "child_id",
        id_param: "sleep_id",
        already_registered: "Sleep is already registered...",
    };

    fn id(&self) -> Option<&str> {
        self.id.value().map(String::as_str)
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Field::Present(id.into_inner());
    }

    fn subject_id(&self) -> Option<&str> {
        self.child_id.value().map(String::as_str)
    }

    fn set_subject_id(&mut self, subject_id: String) {
        self.child_id = Field::Present(subject_id);
    }

    fn validate_create(&self) -> Result<(), ValidationError> {
        let mut required = RequiredFields::new();
        required
            .check(&self.start_time, "start_time")
            .check(&self.end_time, "end_time")
            .check(&self.duration, "duration")
            .check(&self.child_id, "child_id");
        required.finish(RESOURCE)?;

        validate_time_range(&self.start_time, &self.end_time, &self.duration, RESOURCE)?;
        self.validate_formats()?;

        let mut required = RequiredFields::new();
        required
            .check(&self.sleep_type, "type")
            .check(&self.pattern, "pattern");
        required.finish(RESOURCE)?;

        self.validate_content()
    }

    fn validate_update(&self) -> Result<(), ValidationError> {
        let mut required = RequiredFields::new();
        required
            .check(&self.id, "id")
            .check(&self.child_id, "child_id");
        required.finish(RESOURCE)?;

        validate_time_range(&self.start_time, &self.end_time, &self.duration, RESOURCE)?;
        self.validate_formats()?;

        // The pattern's phase names can only be checked against a known type.
        if self.pattern.is_present() {
            let mut required = RequiredFields::new();
            required.check(&self.sleep_type, "type");
            required.finish(RESOURCE)?;
        }

        self.validate_content()
    }

    fn uniqueness_filter(&self) -> RecordFilter {
        RecordFilter::new()
            .eq_field("start_time", &self.start_time)
            .eq_field("child_id", &self.child_id)
    }
}

impl Sleep {
    fn validate_formats(&self) -> Result<(), ValidationError> {
        validate_identifier_field(&self.id, Self::KIND.id_param)?;
        validate_identifier_field(&self.child_id, "child_id")?;
        validate_well_formed(&self.start_time, "start_time")?;
        validate_well_formed(&self.end_time, "end_time")?;
        validate_well_formed(&self.duration, "duration")
    }

    fn validate_content(&self) -> Result<(), ValidationError> {
        validate_well_formed(&self.sleep_type, "type")?;
        validate_well_formed(&self.pattern, "pattern")?;

        if let Some(sleep_type) = self.sleep_type.value() {
            let sleep_type = validate_enum_membership::<SleepType>(
                sleep_type,
                "type",
                "The allowed Sleep Pattern types are",
            )?;
            if let Some(pattern) = self.pattern.value() {
                validate_sleep_pattern(pattern, sleep_type)?;
            }
        }
        Ok(())
    }
}
