//! Where an environment reading was taken.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Field, ValidationError};
use crate::domain::validation::{validate_well_formed, RequiredFields};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    /// Building or site, e.g. `Indoor`.
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub local: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub room: Field<String>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub latitude: Field<f64>,
    #[serde(skip_serializing_if = "Field::is_absent")]
    pub longitude: Field<f64>,
}

impl Location {
    pub fn new(local: &str, room: &str) -> Self {
        Self {
            local: Field::Present(local.to_string()),
            room: Field::Present(room.to_string()),
            ..Self::default()
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Field::Present(latitude);
        self.longitude = Field::Present(longitude);
        self
    }
}

pub fn validate_location(location: &Location) -> Result<(), ValidationError> {
    let mut required = RequiredFields::new();
    required
        .check(&location.local, "location local")
        .check(&location.room, "location room");
    required.finish_with(
        "Location are not in a format that is supported...",
        "Validation of location failed",
    )?;

    validate_well_formed(&location.local, "location local")?;
    validate_well_formed(&location.room, "location room")?;
    validate_well_formed(&location.latitude, "location latitude")?;
    validate_well_formed(&location.longitude, "location longitude")
}
