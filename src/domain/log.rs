//! Daily activity totals synced from tracker devices.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Field, RecordId, ValidationError};
use crate::domain::records::{DuplicatePolicy, RecordFilter, RecordKind, TrackedRecord};
use crate::domain::validation::{
    validate_enum_membership, validate_identifier_field, validate_non_negative,
    validate_well_formed, DeclaredEnum, RequiredFields,
};

const RESOURCE: &str = "Log";

/// Calendar date format of `Log::date`.
pub const LOG_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    Steps,
    Calories,
    ActiveMinutes,
    LightlyActiveMinutes,
    SedentaryMinutes,
}

impl DeclaredEnum for LogType {
    const ALL: &'static [Self] = &[
        LogType::Steps,
        LogType::Calories,
        LogType::ActiveMinutes,
        LogType::LightlyActiveMinutes,
        LogType::SedentaryMinutes,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            LogType::Steps => "steps",
            LogType::Calories => "calories",
            LogType::ActiveMinutes => "active_minutes",
            LogType::LightlyActiveMinutes => "lightly_active_minutes",
            LogType::SedentaryMinutes => "sedentary_minutes",
        }
    }
}

/// One day's total of one metric. A second log for the same
/// `(date, type, child_id)` replaces the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Log {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub id: Field<String>,
    /// `yyyy-MM-dd`.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub date: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub value: Field<f64>,
    #[serde(rename = "type", skip_serializing_if = "Field::is_absent")]
    pub log_type: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub child_id: Field<String>,
}

impl Log {
    pub fn new(date: &str, log_type: LogType, value: f64, child_id: &str) -> Self {
        Self {
            id: Field::Absent,
            date: Field::Present(date.to_string()),
            value: Field::Present(value),
            log_type: Field::Present(log_type.as_str().to_string()),
            child_id: Field::Present(child_id.to_string()),
        }
    }

    fn validate_formats(&self) -> Result<(), ValidationError> {
        validate_identifier_field(&self.id, Self::KIND.id_param)?;
        validate_identifier_field(&self.child_id, "child_id")?;
        validate_well_formed(&self.date, "date")?;
        if let Some(date) = self.date.value() {
            validate_date(date)?;
        }
        Ok(())
    }

    fn validate_content(&self) -> Result<(), ValidationError> {
        validate_well_formed(&self.value, "value")?;
        validate_well_formed(&self.log_type, "type")?;

        if let Some(value) = self.value.value() {
            validate_non_negative(*value, "Value field is invalid...", RESOURCE)?;
        }
        if let Some(log_type) = self.log_type.value() {
            validate_enum_membership::<LogType>(
                log_type,
                "type",
                "The names of the allowed types are",
            )?;
        }
        Ok(())
    }
}

fn validate_date(date: &str) -> Result<(), ValidationError> {
    match NaiveDate::parse_from_str(date, LOG_DATE_FORMAT) {
        Ok(_) if date.len() == 10 => Ok(()),
        _ => Err(ValidationError::invalid_format(
            format!("Date: {} is not in valid ISO 8601 format.", date),
            "Date must be in the format: yyyy-MM-dd",
        )),
    }
}

impl TrackedRecord for Log {
    const KIND: RecordKind = RecordKind {
        label: "Log",
        collection: "logs",
        event_stem: "Log",
        routing_prefix: "logs",
        payload_key: "log",
        subject_field: "child_id",
        id_param: "log_id",
        already_registered: "Log is already registered...",
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
            .check(&self.date, "date")
            .check(&self.value, "value")
            .check(&self.log_type, "type")
            .check(&self.child_id, "child_id");
        required.finish(RESOURCE)?;

        self.validate_formats()?;
        self.validate_content()
    }

    fn validate_update(&self) -> Result<(), ValidationError> {
        let mut required = RequiredFields::new();
        required
            .check(&self.id, "id")
            .check(&self.child_id, "child_id");
        required.finish(RESOURCE)?;

        self.validate_formats()?;
        self.validate_content()
    }

    fn uniqueness_filter(&self) -> RecordFilter {
        RecordFilter::new()
            .eq_field("date", &self.date)
            .eq_field("type", &self.log_type)
            .eq_field("child_id", &self.child_id)
    }

    fn duplicate_policy() -> DuplicatePolicy {
        DuplicatePolicy::Replace
    }
}
