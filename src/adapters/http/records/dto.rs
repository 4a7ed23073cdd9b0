//! Request and response shapes for record endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::records::RecordError;
use crate::ports::{Pagination, Sort};

/// Error body for single-item failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    pub description: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: 400,
            message: message.into(),
            description: description.into(),
        }
    }
}

impl From<&RecordError> for ErrorResponse {
    fn from(err: &RecordError) -> Self {
        Self {
            code: err.status_code(),
            message: err.message().to_string(),
            description: err.description().to_string(),
        }
    }
}

/// Query string of list endpoints: `?page=2&limit=20&sort=-start_time`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
}

impl ListParams {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }

    /// Unparseable sort expressions fall back to the default order.
    pub fn sort(&self) -> Sort {
        self.sort
            .as_deref()
            .and_then(Sort::parse)
            .unwrap_or_default()
    }
}
