//! Typed measurement value object shared by environment and body-fat records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Field, ValidationError};
use crate::domain::validation::{
    validate_enum_membership_ignore_case, validate_well_formed, DeclaredEnum, RequiredFields,
};

/// Measurement types an environment sensor may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentMeasurementType {
    Temperature,
    Humidity,
    Pm1,
    Pm2_5,
    Pm10,
}

impl DeclaredEnum for EnvironmentMeasurementType {
    const ALL: &'static [Self] = &[
        Self::Temperature,
        Self::Humidity,
        Self::Pm1,
        Self::Pm2_5,
        Self::Pm10,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Pm1 => "pm1",
            Self::Pm2_5 => "pm2.5",
            Self::Pm10 => "pm10",
        }
    }
}

/// Measurement types of body-composition records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMeasurementType {
    BodyFat,
}

impl DeclaredEnum for BodyMeasurementType {
    const ALL: &'static [Self] = &[Self::BodyFat];

    fn as_str(&self) -> &'static str {
        match self {
            Self::BodyFat => "body_fat",
        }
    }
}

/// `{type, value, unit}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurement {
    #[serde(rename = "type", skip_serializing_if = "Field::is_absent")]
    pub measurement_type: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub value: Field<f64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub unit: Field<String>,
}

impl Measurement {
    pub fn new(measurement_type: &str, value: f64, unit: &str) -> Self {
        Self {
            measurement_type: Field::Present(measurement_type.to_string()),
            value: Field::Present(value),
            unit: Field::Present(unit.to_string()),
        }
    }
}

pub(crate) const MEASUREMENT_FORMAT_MESSAGE: &str =
    "Measurement are not in a format that is supported!";

/// Validates one measurement against the type set `E` of its owner.
///
/// Missing fields are reported together; a present type is matched
/// case-insensitively.
pub fn validate_measurement<E: DeclaredEnum>(
    measurement: &Measurement,
) -> Result<(), ValidationError> {
    let mut required = RequiredFields::new();
    required
        .check(&measurement.measurement_type, "measurement type")
        .check(&measurement.value, "measurement value")
        .check(&measurement.unit, "measurement unit");
    required.finish_with(MEASUREMENT_FORMAT_MESSAGE, "Validation of measurements failed")?;

    validate_well_formed(&measurement.measurement_type, "measurement type")?;
    validate_well_formed(&measurement.value, "measurement value")?;
    validate_well_formed(&measurement.unit, "measurement unit")?;

    if let Some(measurement_type) = measurement.measurement_type.value() {
        validate_enum_membership_ignore_case::<E>(
            measurement_type,
            "type of measurement",
            "The allowed types are",
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_measurement_passes() {
        let m = Measurement::new("temperature", 21.5, "°C");
        assert!(validate_measurement::<EnvironmentMeasurementType>(&m).is_ok());
    }

    #[test]
    fn type_is_matched_case_insensitively() {
        let m = Measurement::new("Humidity", 40.0, "%");
        assert!(validate_measurement::<EnvironmentMeasurementType>(&m).is_ok());
    }

    #[test]
    fn unknown_type_echoes_lowercased_value_and_lists_allowed_types() {
        let m = Measurement::new("Temperatures", 21.5, "°C");
        let err = validate_measurement::<EnvironmentMeasurementType>(&m).unwrap_err();
        assert!(err.is_invalid_fields());
        assert_eq!(
            err.message(),
            "The type of measurement provided \"temperatures\" is not supported..."
        );
        assert_eq!(
            err.description(),
            "The allowed types are: temperature, humidity, pm1, pm2.5, pm10."
        );
    }

    #[test]
    fn allowed_types_depend_on_owner() {
        let m = Measurement::new("temperature", 21.5, "°C");
        let err = validate_measurement::<BodyMeasurementType>(&m).unwrap_err();
        assert_eq!(err.description(), "The allowed types are: body_fat.");
    }

    #[test]
    fn missing_fields_are_aggregated() {
        let err = validate_measurement::<EnvironmentMeasurementType>(&Measurement::default())
            .unwrap_err();
        assert!(err.is_required_fields());
        assert_eq!(err.message(), "Measurement are not in a format that is supported!");
        assert_eq!(
            err.description(),
            "Validation of measurements failed: \
             measurement type, measurement value, measurement unit is required!"
        );
    }
}
