//! Per-item outcome envelope for batch operations.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::RecordError;

/// An accepted item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSuccess<T> {
    pub code: u16,
    pub item: T,
}

/// A rejected item. `item` is the client's input exactly as it was received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusError {
    pub code: u16,
    pub message: String,
    pub description: String,
    pub item: JsonValue,
}

/// Outcome of a batch: every input item lands in exactly one list, and each
/// list preserves input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiStatus<T> {
    pub success: Vec<StatusSuccess<T>>,
    pub error: Vec<StatusError>,
}

impl<T> Default for MultiStatus<T> {
    fn default() -> Self {
        Self {
            success: Vec::new(),
            error: Vec::new(),
        }
    }
}

impl<T> MultiStatus<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_success(&mut self, code: u16, item: T) {
        self.success.push(StatusSuccess { code, item });
    }

    pub fn push_error(&mut self, error: &RecordError, item: JsonValue) {
        self.error.push(StatusError {
            code: error.status_code(),
            message: error.message().to_string(),
            description: error.description().to_string(),
            item,
        });
    }

    pub fn len(&self) -> usize {
        self.success.len() + self.error.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_success_and_error_lists() {
        let mut status: MultiStatus<JsonValue> = MultiStatus::new();
        status.push_success(201, json!({ "id": "a" }));
        status.push_error(
            &RecordError::conflict("Sleep is already registered..."),
            json!({ "start_time": "x" }),
        );

        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["success"][0]["code"], 201);
        assert_eq!(value["error"][0]["code"], 409);
        assert_eq!(value["error"][0]["message"], "Sleep is already registered...");
        assert_eq!(value["error"][0]["item"], json!({ "start_time": "x" }));
        assert_eq!(status.len(), 2);
    }
}
