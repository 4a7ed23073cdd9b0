//! Equality filters over a record's JSON document.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::domain::foundation::Field;

/// Conjunction of `field == value` conditions on top-level document fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    conditions: Vec<(String, JsonValue)>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// Adds a condition for a present field; absent fields are skipped.
    pub fn eq_field<T: Serialize>(self, field: &str, value: &Field<T>) -> Self {
        if value.is_absent() {
            return self;
        }
        match serde_json::to_value(value) {
            Ok(json) => self.eq(field, json),
            Err(_) => self,
        }
    }

    pub fn conditions(&self) -> &[(String, JsonValue)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// True when every condition holds on `document`.
    pub fn matches(&self, document: &JsonValue) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }

    /// The filter as one JSON object, suitable for document containment queries.
    pub fn to_document(&self) -> JsonValue {
        let map: Map<String, JsonValue> = self.conditions.iter().cloned().collect();
        JsonValue::Object(map)
    }
}
