//! Record operation errors and their HTTP-style status codes.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError, INVALID_FIELDS_MESSAGE};

/// Errors produced by record operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Input rejected before touching storage.
    #[error("{}", .0.message())]
    Validation(#[from] ValidationError),
    /// A record with the same unique data already exists.
    #[error("{message}")]
    Conflict { message: String },
    /// The addressed record does not exist.
    #[error("{message}")]
    NotFound { message: String },
    /// The store failed for reasons unrelated to the input.
    #[error("{message}")]
    Persistence { message: String, description: String },
}

impl RecordError {
    pub fn conflict(message: impl Into<String>) -> Self {
        RecordError::Conflict {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        RecordError::NotFound {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>, description: impl Into<String>) -> Self {
        RecordError::Persistence {
            message: message.into(),
            description: description.into(),
        }
    }

    /// The store accepted a create but returned nothing.
    pub fn missing_create_result(label: &str) -> Self {
        Self::persistence(
            "An internal error has occurred in the database!",
            format!("{} could not be saved: the store returned no record.", label),
        )
    }

    pub fn status_code(&self) -> u16 {
        match self {
            RecordError::Validation(_) => 400,
            RecordError::Conflict { .. } => 409,
            RecordError::NotFound { .. } => 404,
            RecordError::Persistence { .. } => 500,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RecordError::Validation(e) if e.is_invalid_format() => ErrorCode::InvalidFormat,
            RecordError::Validation(_) => ErrorCode::ValidationFailed,
            RecordError::Conflict { .. } => ErrorCode::Conflict,
            RecordError::NotFound { .. } => ErrorCode::NotFound,
            RecordError::Persistence { .. } => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RecordError::Validation(e) => e.message(),
            RecordError::Conflict { message } | RecordError::NotFound { message } => message,
            RecordError::Persistence { message, .. } => message,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            RecordError::Validation(e) => e.description(),
            RecordError::Conflict { .. } => {
                "A registration with the same unique data already exists!"
            }
            RecordError::NotFound { .. } => {
                "The requested record was not found or is no longer available."
            }
            RecordError::Persistence { description, .. } => description,
        }
    }
}

impl From<DomainError> for RecordError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidFormat => RecordError::Validation(ValidationError::invalid_format(
                INVALID_FIELDS_MESSAGE,
                err.message,
            )),
            ErrorCode::ValidationFailed => RecordError::Validation(
                ValidationError::invalid_fields(INVALID_FIELDS_MESSAGE, err.message),
            ),
            ErrorCode::Conflict => RecordError::Conflict {
                message: err.message,
            },
            ErrorCode::NotFound => RecordError::NotFound {
                message: err.message,
            },
            _ => RecordError::Persistence {
                message: "An internal error has occurred in the database!".to_string(),
                description: err.message,
            },
        }
    }
}
