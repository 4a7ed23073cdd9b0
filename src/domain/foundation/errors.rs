//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Message shared by every aggregated missing-field error.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Required fields were not provided...";

/// Message shared by semantic field errors that carry no field-specific wording.
pub const INVALID_FIELDS_MESSAGE: &str = "One or more request fields are invalid...";

/// Tail of every negative-value description.
pub const NEGATIVE_VALUE: &str = "The value provided has a negative value!";

/// Errors raised while validating a record before it is persisted.
///
/// Every variant carries a short `message` and a longer `description`; both
/// are part of the public contract because clients assert on them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more mandatory fields are absent.
    #[error("{message} {description}")]
    RequiredFields { message: String, description: String },

    /// A field has the wrong syntactic shape.
    #[error("{message} {description}")]
    InvalidFormat { message: String, description: String },

    /// A field is well-formed but semantically wrong.
    #[error("{message} {description}")]
    InvalidFields { message: String, description: String },
}

impl ValidationError {
    /// Aggregated missing-field error: `"<Resource> validation failed: a, b is required!"`.
    pub fn required_fields(resource: &str, fields: &[&str]) -> Self {
        Self::required(
            REQUIRED_FIELDS_MESSAGE,
            format!(
                "{} validation failed: {} is required!",
                resource,
                fields.join(", ")
            ),
        )
    }

    /// Missing-field error with caller-provided wording.
    pub fn required(message: impl Into<String>, description: impl Into<String>) -> Self {
        ValidationError::RequiredFields {
            message: message.into(),
            description: description.into(),
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(message: impl Into<String>, description: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            message: message.into(),
            description: description.into(),
        }
    }

    /// Creates an invalid fields validation error.
    pub fn invalid_fields(message: impl Into<String>, description: impl Into<String>) -> Self {
        ValidationError::InvalidFields {
            message: message.into(),
            description: description.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ValidationError::RequiredFields { message, .. }
            | ValidationError::InvalidFormat { message, .. }
            | ValidationError::InvalidFields { message, .. } => message,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ValidationError::RequiredFields { description, .. }
            | ValidationError::InvalidFormat { description, .. }
            | ValidationError::InvalidFields { description, .. } => description,
        }
    }

    pub fn is_required_fields(&self) -> bool {
        matches!(self, ValidationError::RequiredFields { .. })
    }

    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ValidationError::InvalidFormat { .. })
    }

    pub fn is_invalid_fields(&self) -> bool {
        matches!(self, ValidationError::InvalidFields { .. })
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    InvalidFormat,

    // State errors
    Conflict,
    NotFound,

    // Infrastructure errors
    DatabaseError,
    EventBusError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::EventBusError => "EVENT_BUS_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
///
/// Ports return this; the application layer maps it onto its own error type.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_joins_names_in_given_order() {
        let err =
            ValidationError::required_fields("Sleep", &["start_time", "end_time", "child_id"]);
        assert!(err.is_required_fields());
        assert_eq!(err.message(), "Required fields were not provided...");
        assert_eq!(
            err.description(),
            "Sleep validation failed: start_time, end_time, child_id is required!"
        );
    }

    #[test]
    fn validation_error_displays_message_and_description() {
        let err = ValidationError::invalid_fields("Date field is invalid...", "end before start");
        assert_eq!(format!("{}", err), "Date field is invalid... end before start");
    }

    #[test]
    fn kind_predicates_are_exclusive() {
        let err = ValidationError::invalid_format("m", "d");
        assert!(err.is_invalid_format());
        assert!(!err.is_invalid_fields());
        assert!(!err.is_required_fields());
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::NotFound, "Sleep not found");
        assert_eq!(format!("{}", err), "[NOT_FOUND] Sleep not found");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::new(ErrorCode::DatabaseError, "insert failed")
            .with_detail("kind", "sleep")
            .with_detail("sqlstate", "23505");

        assert_eq!(err.details.get("kind"), Some(&"sleep".to_string()));
        assert_eq!(err.details.get("sqlstate"), Some(&"23505".to_string()));
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::EventBusError), "EVENT_BUS_ERROR");
        assert_eq!(format!("{}", ErrorCode::InternalError), "INTERNAL_ERROR");
    }
}
