//! Body-fat measurement record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Field, RecordId, ValidationError};
use crate::domain::measurement::BodyMeasurementType;
use crate::domain::records::{RecordFilter, RecordKind, TrackedRecord};
use crate::domain::validation::{
    validate_enum_membership_ignore_case, validate_identifier_field, validate_non_negative,
    validate_well_formed, RequiredFields,
};

const RESOURCE: &str = "Body Fat";

/// A single body-fat reading for a child.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyFat {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub id: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub timestamp: Field<DateTime<Utc>>,
    #[serde(rename = "type", skip_serializing_if = "Field::is_absent")]
    pub measurement_type: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub value: Field<f64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub unit: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub child_id: Field<String>,
}

impl TrackedRecord for BodyFat {
    const KIND: RecordKind = RecordKind {
        label: "Body Fat",
        collection: "body_fats",
        event_stem: "BodyFat",
        routing_prefix: "bodyfats",
        payload_key: "bodyfat",
        subject_field: "child_id",
        id_param: "bodyfat_id",
        already_registered: "Body Fat is already registered...",
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
            .check(&self.timestamp, "timestamp")
            .check(&self.child_id, "child_id");
        required.finish(RESOURCE)?;

        self.validate_formats()?;

        let mut required = RequiredFields::new();
        required
            .check(&self.measurement_type, "type")
            .check(&self.value, "value")
            .check(&self.unit, "unit");
        required.finish(RESOURCE)?;

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
            .eq_field("timestamp", &self.timestamp)
            .eq_field("child_id", &self.child_id)
    }
}

impl BodyFat {
    fn validate_formats(&self) -> Result<(), ValidationError> {
        validate_identifier_field(&self.id, Self::KIND.id_param)?;
        validate_identifier_field(&self.child_id, "child_id")?;
        validate_well_formed(&self.timestamp, "timestamp")
    }

    fn validate_content(&self) -> Result<(), ValidationError> {
        validate_well_formed(&self.measurement_type, "type")?;
        validate_well_formed(&self.value, "value")?;
        validate_well_formed(&self.unit, "unit")?;

        if let Some(measurement_type) = self.measurement_type.value() {
            validate_enum_membership_ignore_case::<BodyMeasurementType>(
                measurement_type,
                "type of measurement",
                "The allowed types are",
            )?;
        }
        if let Some(value) = self.value.value() {
            validate_non_negative(*value, "Value field is invalid...", RESOURCE)?;
        }
        Ok(())
    }
}
