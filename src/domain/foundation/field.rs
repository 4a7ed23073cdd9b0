//! Three-state field presence for loosely-shaped client input.
//!
//! Tracker payloads arrive as arbitrary JSON. Instead of failing
//! deserialization on the first bad field, every record field decodes into a
//! [`Field`] so validators can report problems in a fixed order.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

/// A record field as received from a client.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    /// Missing, `null`, or the empty string.
    Absent,
    /// Present and decodable as `T`.
    Present(T),
    /// Present but not decodable as `T`; the raw value is kept for echoing.
    Malformed(JsonValue),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    /// The decoded value, if there is one.
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Present(v) => Some(v),
            _ => None,
        }
    }

    /// The raw value of a malformed field.
    pub fn malformed(&self) -> Option<&JsonValue> {
        match self {
            Field::Malformed(raw) => Some(raw),
            _ => None,
        }
    }
}

impl<T: DeserializeOwned> Field<T> {
    /// Classifies a raw JSON value.
    pub fn from_json(raw: JsonValue) -> Self {
        match raw {
            JsonValue::Null => Field::Absent,
            JsonValue::String(ref s) if s.is_empty() => Field::Absent,
            other => match serde_json::from_value::<T>(other.clone()) {
                Ok(value) => Field::Present(value),
                Err(_) => Field::Malformed(other),
            },
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Present(value)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = JsonValue::deserialize(deserializer)?;
        Ok(Field::from_json(raw))
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Field::Absent => serializer.serialize_none(),
            Field::Present(value) => value.serialize(serializer),
            Field::Malformed(raw) => raw.serialize(serializer),
        }
    }
}

/// Decodes any JSON value into a record, treating non-objects as empty input.
pub fn record_from_json<R>(raw: &JsonValue) -> R
where
    R: DeserializeOwned + Default,
{
    match raw {
        JsonValue::Object(_) => serde_json::from_value(raw.clone()).unwrap_or_default(),
        _ => R::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, Serialize)]
    #[serde(default)]
    struct Counter {
        #[serde(skip_serializing_if = "Field::is_absent")]
        count: Field<i64>,
        #[serde(skip_serializing_if = "Field::is_absent")]
        name: Field<String>,
    }

    #[test]
    fn null_and_empty_string_are_absent() {
        assert_eq!(Field::<String>::from_json(json!(null)), Field::Absent);
        assert_eq!(Field::<String>::from_json(json!("")), Field::Absent);
    }

    #[test]
    fn wrong_type_is_malformed_and_keeps_raw() {
        let field = Field::<i64>::from_json(json!("ten"));
        assert_eq!(field.malformed(), Some(&json!("ten")));
        assert!(field.is_present());
    }

    #[test]
    fn missing_keys_deserialize_to_absent() {
        let counter: Counter = serde_json::from_value(json!({ "count": 3 })).unwrap();
        assert_eq!(counter.count, Field::Present(3));
        assert!(counter.name.is_absent());
    }

    #[test]
    fn serialization_echoes_malformed_and_skips_absent() {
        let counter: Counter = serde_json::from_value(json!({ "count": [1, 2] })).unwrap();
        assert_eq!(serde_json::to_value(&counter).unwrap(), json!({ "count": [1, 2] }));
    }

    #[test]
    fn non_object_input_becomes_empty_record() {
        let counter: Counter = record_from_json(&json!(42));
        assert!(counter.count.is_absent());
        assert!(counter.name.is_absent());
    }
}
