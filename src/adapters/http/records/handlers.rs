//! HTTP handlers for record endpoints, generic over the record kind.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value as JsonValue;
use tracing::error;

use crate::application::handlers::records::{
    AddRecordsCommand, AddRecordsHandler, AddRecordsResult, GetRecordHandler, GetRecordQuery,
    ListRecordsHandler, ListRecordsQuery, RecordPayload, RemoveRecordCommand, RemoveRecordHandler,
    UpdateRecordCommand, UpdateRecordHandler,
};
use crate::application::EventDispatcher;
use crate::domain::foundation::CommandMetadata;
use crate::domain::records::{RecordError, TrackedRecord};
use crate::ports::RecordRepository;

use super::dto::{ErrorResponse, ListParams};

/// Header carrying the request id set by the request-id layer.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Header carrying the subject's total record count on list responses.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

pub struct RecordHandlers<R: TrackedRecord> {
    add_handler: Arc<AddRecordsHandler<R>>,
    update_handler: Arc<UpdateRecordHandler<R>>,
    remove_handler: Arc<RemoveRecordHandler<R>>,
    get_handler: Arc<GetRecordHandler<R>>,
    list_handler: Arc<ListRecordsHandler<R>>,
}

impl<R: TrackedRecord> Clone for RecordHandlers<R> {
    fn clone(&self) -> Self {
        Self {
            add_handler: Arc::clone(&self.add_handler),
            update_handler: Arc::clone(&self.update_handler),
            remove_handler: Arc::clone(&self.remove_handler),
            get_handler: Arc::clone(&self.get_handler),
            list_handler: Arc::clone(&self.list_handler),
        }
    }
}

impl<R: TrackedRecord> RecordHandlers<R> {
    /// Wires every record handler onto one repository and dispatcher.
    pub fn new(repository: Arc<dyn RecordRepository<R>>, dispatcher: EventDispatcher) -> Self {
        Self {
            add_handler: Arc::new(AddRecordsHandler::new(
                Arc::clone(&repository),
                dispatcher.clone(),
            )),
            update_handler: Arc::new(UpdateRecordHandler::new(
                Arc::clone(&repository),
                dispatcher.clone(),
            )),
            remove_handler: Arc::new(RemoveRecordHandler::new(
                Arc::clone(&repository),
                dispatcher,
            )),
            get_handler: Arc::new(GetRecordHandler::new(Arc::clone(&repository))),
            list_handler: Arc::new(ListRecordsHandler::new(repository)),
        }
    }

    /// The add handler, shared with the bus sync handler.
    pub fn add_handler(&self) -> Arc<AddRecordsHandler<R>> {
        Arc::clone(&self.add_handler)
    }
}

fn metadata_from(headers: &HeaderMap) -> CommandMetadata {
    let metadata = CommandMetadata::new().with_source("http");
    match headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        Some(request_id) => metadata.with_correlation_id(request_id),
        None => metadata,
    }
}

fn parse_body(body: &Bytes) -> Result<JsonValue, Response> {
    serde_json::from_slice(body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(
                "The request body is not valid JSON!",
                e.to_string(),
            )),
        )
            .into_response()
    })
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /v1/children/:child_id/<kind> - Add one record or a batch
pub async fn add_records<R: TrackedRecord>(
    State(handlers): State<RecordHandlers<R>>,
    Path(subject_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let payload = match RecordPayload::from_json(body) {
        Ok(payload) => payload,
        Err(e) => return handle_record_error(e),
    };

    let cmd = AddRecordsCommand::new(payload).for_subject(subject_id);

    match handlers.add_handler.handle(cmd, metadata_from(&headers)).await {
        Ok(AddRecordsResult::Single(record)) => (StatusCode::CREATED, Json(record)).into_response(),
        Ok(AddRecordsResult::Batch(status)) => (StatusCode::CREATED, Json(status)).into_response(),
        Err(e) => handle_record_error(e),
    }
}

/// GET /v1/children/:child_id/<kind> - List a subject's records
pub async fn list_records<R: TrackedRecord>(
    State(handlers): State<RecordHandlers<R>>,
    Path(subject_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Response {
    let query = ListRecordsQuery {
        subject_id,
        pagination: params.pagination(),
        sort: params.sort(),
    };

    match handlers.list_handler.handle(query).await {
        Ok(list) => (
            StatusCode::OK,
            [(TOTAL_COUNT_HEADER, list.total.to_string())],
            Json(list.items),
        )
            .into_response(),
        Err(e) => handle_record_error(e),
    }
}

/// GET /v1/children/:child_id/<kind>/:id - Get one record
pub async fn get_record<R: TrackedRecord>(
    State(handlers): State<RecordHandlers<R>>,
    Path((subject_id, record_id)): Path<(String, String)>,
) -> Response {
    let query = GetRecordQuery {
        record_id,
        subject_id,
    };

    match handlers.get_handler.handle(query).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => handle_record_error(e),
    }
}

/// PATCH /v1/children/:child_id/<kind>/:id - Apply a partial update
pub async fn update_record<R: TrackedRecord>(
    State(handlers): State<RecordHandlers<R>>,
    Path((subject_id, record_id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let changes = match parse_body(&body) {
        Ok(changes) => changes,
        Err(response) => return response,
    };

    let cmd = UpdateRecordCommand {
        record_id,
        subject_id,
        changes,
    };

    match handlers
        .update_handler
        .handle(cmd, metadata_from(&headers))
        .await
    {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => handle_record_error(e),
    }
}

/// DELETE /v1/children/:child_id/<kind>/:id - Remove a record
pub async fn remove_record<R: TrackedRecord>(
    State(handlers): State<RecordHandlers<R>>,
    Path((subject_id, record_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let cmd = RemoveRecordCommand {
        record_id,
        subject_id,
    };

    match handlers
        .remove_handler
        .handle(cmd, metadata_from(&headers))
        .await
    {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_record_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_record_error(error: RecordError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %error, description = error.description(), "Record request failed");
    }
    (status, Json(ErrorResponse::from(&error))).into_response()
}
