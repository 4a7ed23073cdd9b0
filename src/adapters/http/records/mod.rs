//! HTTP adapter for record endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, ListParams};
pub use handlers::{RecordHandlers, REQUEST_ID_HEADER, TOTAL_COUNT_HEADER};
pub use routes::{environment_routes, record_routes};
