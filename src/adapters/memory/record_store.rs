//! In-Memory Record Store Adapter
//!
//! Keeps each record kind as a list of JSON documents in insertion order.
//! Filters and sorting operate on the serialized document, the same shape
//! the Postgres adapter stores.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, RecordId};
use crate::domain::records::{RecordFilter, TrackedRecord};
use crate::ports::{Pagination, RecordRepository, Sort, SortDirection};

#[derive(Debug, Clone)]
struct StoredRecord {
    seq: u64,
    id: String,
    document: JsonValue,
}

#[derive(Debug, Default)]
struct StoreState {
    next_seq: u64,
    rows: Vec<StoredRecord>,
}

/// In-memory storage for one record kind.
///
/// Enforces the kind's uniqueness filter on `create` and `update`, mirroring
/// the unique indexes of the database schema.
pub struct InMemoryRecordStore<R> {
    state: Arc<RwLock<StoreState>>,
    _kind: PhantomData<fn() -> R>,
}

impl<R> Clone for InMemoryRecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            _kind: PhantomData,
        }
    }
}

impl<R> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            _kind: PhantomData,
        }
    }
}

impl<R: TrackedRecord> InMemoryRecordStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records (useful for tests)
    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Every stored record in insertion order.
    pub async fn all(&self) -> Vec<R> {
        self.state
            .read()
            .await
            .rows
            .iter()
            .map(|row| R::from_json(&row.document))
            .collect()
    }

    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.rows.clear();
    }
}

impl StoreState {
    /// True when a row other than `own_id` already holds the unique key.
    fn violates_unique_key(&self, unique: &RecordFilter, own_id: Option<&str>) -> bool {
        !unique.is_empty()
            && self
                .rows
                .iter()
                .any(|row| Some(row.id.as_str()) != own_id && unique.matches(&row.document))
    }
}

fn duplicate_error<R: TrackedRecord>() -> DomainError {
    DomainError::new(
        ErrorCode::Conflict,
        format!("Duplicate {} record", R::KIND.collection),
    )
    .with_detail("kind", R::KIND.collection)
}

fn compare_values(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(JsonValue::Number(x)), Some(JsonValue::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => x.cmp(y),
        (Some(JsonValue::Bool(x)), Some(JsonValue::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

fn sort_rows(rows: &mut [&StoredRecord], sort: &Sort) {
    rows.sort_by(|a, b| {
        let ordering = if sort.field == "created_at" {
            a.seq.cmp(&b.seq)
        } else {
            compare_values(a.document.get(&sort.field), b.document.get(&sort.field))
                .then(a.seq.cmp(&b.seq))
        };
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

#[async_trait]
impl<R: TrackedRecord> RecordRepository<R> for InMemoryRecordStore<R> {
    async fn exists(&self, filter: &RecordFilter) -> Result<bool, DomainError> {
        let state = self.state.read().await;
        Ok(state.rows.iter().any(|row| filter.matches(&row.document)))
    }

    async fn create(&self, record: &R) -> Result<Option<R>, DomainError> {
        // Identifiers are always assigned here, never taken from input.
        let id = RecordId::generate();
        let mut stored = record.clone();
        stored.set_id(id.clone());
        let document = stored.to_json();

        let mut state = self.state.write().await;
        if state.violates_unique_key(&stored.uniqueness_filter(), None) {
            return Err(duplicate_error::<R>());
        }

        let id = id.into_inner();
        let seq = state.next_seq;
        state.next_seq += 1;
        state.rows.push(StoredRecord { seq, id, document });

        Ok(Some(stored))
    }

    async fn find_by_filter(
        &self,
        filter: &RecordFilter,
        pagination: Pagination,
        sort: &Sort,
    ) -> Result<Vec<R>, DomainError> {
        let state = self.state.read().await;
        let mut rows: Vec<&StoredRecord> = state
            .rows
            .iter()
            .filter(|row| filter.matches(&row.document))
            .collect();
        sort_rows(&mut rows, sort);

        Ok(rows
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.limit as usize)
            .map(|row| R::from_json(&row.document))
            .collect())
    }

    async fn find_one(&self, filter: &RecordFilter) -> Result<Option<R>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .iter()
            .find(|row| filter.matches(&row.document))
            .map(|row| R::from_json(&row.document)))
    }

    async fn update(&self, record: &R) -> Result<Option<R>, DomainError> {
        let Some(id) = record.id() else {
            return Ok(None);
        };

        let mut state = self.state.write().await;
        if state.violates_unique_key(&record.uniqueness_filter(), Some(id)) {
            return Err(duplicate_error::<R>());
        }
        match state.rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.document = record.to_json();
                Ok(Some(R::from_json(&row.document)))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let before = state.rows.len();
        state.rows.retain(|row| row.id != id);
        Ok(state.rows.len() < before)
    }

    async fn count(&self, filter: &RecordFilter) -> Result<u64, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .iter()
            .filter(|row| filter.matches(&row.document))
            .count() as u64)
    }
}
