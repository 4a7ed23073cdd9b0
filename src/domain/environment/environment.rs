//! Environment record: a set of sensor measurements taken in one place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Field, RecordId, ValidationError, REQUIRED_FIELDS_MESSAGE};
use crate::domain::measurement::{
    validate_measurement, EnvironmentMeasurementType, Measurement, MEASUREMENT_FORMAT_MESSAGE,
};
use crate::domain::records::{RecordFilter, RecordKind, TrackedRecord};
use crate::domain::validation::{validate_identifier_field, validate_well_formed, RequiredFields};

use super::location::{validate_location, Location};

const RESOURCE: &str = "Environment";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub id: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub institution_id: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub location: Field<Location>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub measurements: Field<Vec<Measurement>>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub climatized: Field<bool>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub timestamp: Field<DateTime<Utc>>,
}

impl TrackedRecord for Environment {
    const KIND: RecordKind = RecordKind {
        label: "Environment",
        collection: "environments",
        event_stem: "Environment",
        routing_prefix: "environments",
        payload_key: "environment",
        subject_field: "institution_id",
        id_param: "environment_id",
        already_registered: "Measurement of environment is already registered...",
    };

    fn id(&self) -> Option<&str> {
        self.id.value().map(String::as_str)
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = Field::Present(id.into_inner());
    }

    fn subject_id(&self) -> Option<&str> {
        self.institution_id.value().map(String::as_str)
    }

    fn set_subject_id(&mut self, subject_id: String) {
        self.institution_id = Field::Present(subject_id);
    }

    fn validate_create(&self) -> Result<(), ValidationError> {
        let mut required = RequiredFields::new();
        required
            .check(&self.timestamp, "timestamp")
            .check(&self.institution_id, "institution_id")
            .check(&self.location, "location")
            .check(&self.measurements, "measurements");
        required.finish_described(REQUIRED_FIELDS_MESSAGE, |missing| {
            format!("Validation of environment measurements failed: {} required!", missing)
        })?;

        self.validate_formats()?;
        self.validate_content()
    }

    fn validate_update(&self) -> Result<(), ValidationError> {
        let mut required = RequiredFields::new();
        required
            .check(&self.id, "id")
            .check(&self.institution_id, "institution_id");
        required.finish(RESOURCE)?;

        self.validate_formats()?;
        self.validate_content()
    }

    fn uniqueness_filter(&self) -> RecordFilter {
        RecordFilter::new()
            .eq_field("timestamp", &self.timestamp)
            .eq_field("location", &self.location)
    }
}

impl Environment {
    fn validate_formats(&self) -> Result<(), ValidationError> {
        validate_identifier_field(&self.id, Self::KIND.id_param)?;
        validate_identifier_field(&self.institution_id, "institution_id")?;
        validate_well_formed(&self.timestamp, "timestamp")
    }

    fn validate_content(&self) -> Result<(), ValidationError> {
        validate_well_formed(&self.location, "location")?;
        validate_well_formed(&self.measurements, "measurements")?;
        validate_well_formed(&self.climatized, "climatized")?;

        if let Some(location) = self.location.value() {
            validate_location(location)?;
        }
        if let Some(measurements) = self.measurements.value() {
            if measurements.is_empty() {
                return Err(ValidationError::invalid_format(
                    MEASUREMENT_FORMAT_MESSAGE,
                    "The measurements collection must not be empty!",
                ));
            }
            measurements
                .iter()
                .try_for_each(validate_measurement::<EnvironmentMeasurementType>)?;
        }
        Ok(())
    }
}
