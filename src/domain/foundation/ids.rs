//! Strongly-typed identifier value objects.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Length of the canonical record identifier.
pub const RECORD_ID_LEN: usize = 24;

/// Returns true when `value` is a 24-character hexadecimal string.
pub fn is_record_id(value: &str) -> bool {
    value.len() == RECORD_ID_LEN && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Canonical identifier of a stored record (and of children/institutions).
///
/// Shape: 24 lowercase hex characters. Generated ids start with the creation
/// second so they sort roughly by insertion time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a new identifier from the current time and random bits.
    pub fn generate() -> Self {
        let seconds = Utc::now().timestamp() as u32;
        let random = Uuid::new_v4().simple().to_string();
        Self(format!("{:08x}{}", seconds, &random[..16]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_record_id(s) {
            Ok(Self(s.to_lowercase()))
        } else {
            Err(ValidationError::invalid_format(
                "Parameter {id} is not in valid format!",
                "A 24-byte hex ID similar to this: 507f191e810c19729de860ea is expected.",
            ))
        }
    }
}
