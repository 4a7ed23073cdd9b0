//! Physical activity record and its create/update validators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Field, RecordId, ValidationError};
use crate::domain::records::{RecordFilter, RecordKind, TrackedRecord};
use crate::domain::validation::{
    validate_identifier_field, validate_non_negative, validate_time_range, validate_well_formed,
    RequiredFields,
};

use super::levels::{validate_levels, PhysicalActivityLevel};

const RESOURCE: &str = "Physical Activity";

/// A walk, run or other tracked exercise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalActivity {
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
    pub child_id: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub calories: Field<f64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub steps: Field<i64>,
    /// Meters.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub distance: Field<f64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub levels: Field<Vec<PhysicalActivityLevel>>,
}

impl TrackedRecord for PhysicalActivity {
    const KIND: RecordKind = RecordKind {
        label: "Physical Activity",
        collection: "physical_activities",
        event_stem: "PhysicalActivity",
        routing_prefix: "physicalactivities",
        payload_key: "physicalactivity",
        subject_field: "child_id",
        id_param: "physicalactivity_id",
        already_registered: "Physical Activity is already registered...",
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
            .check(&self.name, "name")
            .check(&self.calories, "calories");
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
        self.validate_content()
    }

    fn uniqueness_filter(&self) -> RecordFilter {
        RecordFilter::new()
            .eq_field("start_time", &self.start_time)
            .eq_field("child_id", &self.child_id)
    }
}

impl PhysicalActivity {
    fn validate_formats(&self) -> Result<(), ValidationError> {
        validate_identifier_field(&self.id, Self::KIND.id_param)?;
        validate_identifier_field(&self.child_id, "child_id")?;
        validate_well_formed(&self.start_time, "start_time")?;
        validate_well_formed(&self.end_time, "end_time")?;
        validate_well_formed(&self.duration, "duration")
    }

    fn validate_content(&self) -> Result<(), ValidationError> {
        validate_well_formed(&self.name, "name")?;
        validate_well_formed(&self.calories, "calories")?;
        validate_well_formed(&self.steps, "steps")?;
        validate_well_formed(&self.distance, "distance")?;
        validate_well_formed(&self.levels, "levels")?;

        if let Some(calories) = self.calories.value() {
            validate_non_negative(*calories, "Calories field is invalid...", RESOURCE)?;
        }
        if let Some(steps) = self.steps.value() {
            validate_non_negative(*steps, "Steps field is invalid...", RESOURCE)?;
        }
        if let Some(distance) = self.distance.value() {
            validate_non_negative(*distance, "Distance field is invalid...", RESOURCE)?;
        }
        if let Some(levels) = self.levels.value() {
            validate_levels(levels)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value as JsonValue};

    const CHILD: &str = "5a62be07de34500146d9c544";

    fn activity_json() -> JsonValue {
        json!({
            "start_time": "2018-12-14T12:52:59Z",
            "end_time": "2018-12-14T13:12:37Z",
            "duration": 1178000,
            "child_id": CHILD,
            "name": "walk",
            "calories": 200,
            "steps": 1000,
            "levels": [
                { "name": "sedentary", "duration": 60000 },
                { "name": "lightly", "duration": 60000 },
                { "name": "fairly", "duration": 60000 },
                { "name": "very", "duration": 60000 }
            ]
        })
    }

    fn activity_with(changes: JsonValue) -> PhysicalActivity {
        let mut value = activity_json();
        for (k, v) in changes.as_object().unwrap() {
            value[k] = v.clone();
        }
        PhysicalActivity::from_json(&value)
    }

    #[test]
    fn valid_activity_passes_create() {
        assert!(PhysicalActivity::from_json(&activity_json()).validate_create().is_ok());
    }

    #[test]
    fn empty_activity_lists_base_fields() {
        let err = PhysicalActivity::default().validate_create().unwrap_err();
        assert_eq!(
            err.description(),
            "Physical Activity validation failed: \
             start_time, end_time, duration, child_id is required!"
        );
    }

    #[test]
    fn missing_name_and_calories_are_aggregated() {
        let err = activity_with(json!({ "name": null, "calories": null }))
            .validate_create()
            .unwrap_err();
        assert_eq!(
            err.description(),
            "Physical Activity validation failed: name, calories is required!"
        );
    }

    #[test]
    fn negative_calories_fail() {
        let err = activity_with(json!({ "calories": -200 })).validate_create().unwrap_err();
        assert_eq!(err.message(), "Calories field is invalid...");
        assert_eq!(
            err.description(),
            "Physical Activity validation failed: The value provided has a negative value!"
        );
    }

    #[test]
    fn negative_steps_fail() {
        let err = activity_with(json!({ "steps": -1000 })).validate_create().unwrap_err();
        assert_eq!(err.message(), "Steps field is invalid...");
    }

    #[test]
    fn steps_must_be_integer() {
        let err = activity_with(json!({ "steps": 10.5 })).validate_create().unwrap_err();
        assert!(err.is_invalid_format());
        assert_eq!(err.description(), "The value '10.5' of steps field is invalid.");
    }

    #[test]
    fn levels_are_validated_when_present() {
        let err = activity_with(json!({ "levels": [{ "name": "sedentaries", "duration": 1 }] }))
            .validate_create()
            .unwrap_err();
        assert!(err.message().contains("sedentaries"));
    }

    #[test]
    fn levels_are_optional() {
        assert!(activity_with(json!({ "levels": null })).validate_create().is_ok());
    }

    #[test]
    fn update_rejects_invalid_id() {
        let patch = PhysicalActivity::from_json(&json!({
            "id": "5a62be07de34500146d9c5442",
            "child_id": CHILD
        }));
        let err = patch.validate_update().unwrap_err();
        assert_eq!(err.message(), "Parameter {physicalactivity_id} is not in valid format!");
    }

    #[test]
    fn update_rejects_negative_duration() {
        let patch = PhysicalActivity::from_json(&json!({
            "id": "5a62be07de34500146d9c545",
            "child_id": CHILD,
            "duration": -1178000
        }));
        let err = patch.validate_update().unwrap_err();
        assert_eq!(
            err.description(),
            "Physical Activity validation failed: The value provided has a negative value!"
        );
    }
}
