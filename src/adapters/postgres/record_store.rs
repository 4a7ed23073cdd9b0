//! PostgreSQL implementation of RecordRepository.
//!
//! All kinds live in `tracking_records` as JSONB documents. Equality filters
//! become `document @> $filter` containment checks, so they share the GIN
//! index; object and array values are additionally compared whole, since
//! containment alone would match a stored superset. Unique keys are enforced
//! by per-kind partial indexes.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};
use std::marker::PhantomData;

use crate::domain::foundation::{DomainError, ErrorCode, RecordId};
use crate::domain::records::{RecordFilter, TrackedRecord};
use crate::ports::{Pagination, RecordRepository, Sort, SortDirection};

const UNIQUE_VIOLATION: &str = "23505";
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// PostgreSQL storage for one record kind.
pub struct PostgresRecordStore<R> {
    pool: PgPool,
    _kind: PhantomData<fn() -> R>,
}

impl<R> Clone for PostgresRecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _kind: PhantomData,
        }
    }
}

impl<R: TrackedRecord> PostgresRecordStore<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _kind: PhantomData,
        }
    }

    fn kind() -> &'static str {
        R::KIND.collection
    }
}

/// Maps a driver error onto the domain's error codes.
fn map_db_error(action: &str, e: sqlx::Error) -> DomainError {
    let sqlstate = match &e {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    };

    let code = match sqlstate.as_deref() {
        Some(UNIQUE_VIOLATION) => ErrorCode::Conflict,
        Some(INVALID_TEXT_REPRESENTATION) => ErrorCode::InvalidFormat,
        _ => ErrorCode::DatabaseError,
    };

    let err = DomainError::new(code, format!("Failed to {}: {}", action, e));
    match sqlstate {
        Some(state) => err.with_detail("sqlstate", state),
        None => err,
    }
}

fn order_clause(sort: &Sort) -> String {
    let direction = match sort.direction {
        SortDirection::Ascending => "ASC",
        SortDirection::Descending => "DESC",
    };
    if sort.field == "created_at" {
        format!("ORDER BY created_at {direction}")
    } else {
        format!("ORDER BY document -> $2 {direction}, created_at {direction}")
    }
}

/// WHERE predicate for `filter` bound as one JSONB parameter `$param`.
fn filter_clause(filter: &RecordFilter, param: usize) -> String {
    let mut clause = format!("document @> ${param}");
    for (field, value) in filter.conditions() {
        if value.is_object() || value.is_array() {
            let key = field.replace('\'', "''");
            clause.push_str(&format!(" AND document -> '{key}' = ${param} -> '{key}'"));
        }
    }
    clause
}

fn row_to_record<R: TrackedRecord>(row: sqlx::postgres::PgRow) -> Result<R, DomainError> {
    let document: JsonValue = row
        .try_get("document")
        .map_err(|e| map_db_error("read record document", e))?;
    Ok(R::from_json(&document))
}

#[async_trait]
impl<R: TrackedRecord> RecordRepository<R> for PostgresRecordStore<R> {
    async fn exists(&self, filter: &RecordFilter) -> Result<bool, DomainError> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM tracking_records WHERE kind = $1 AND {})",
            filter_clause(filter, 2)
        );
        let result: (bool,) = sqlx::query_as(&sql)
            .bind(Self::kind())
            .bind(filter.to_document())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error("check record existence", e))?;

        Ok(result.0)
    }

    async fn create(&self, record: &R) -> Result<Option<R>, DomainError> {
        // Identifiers are always assigned here, never taken from input.
        let id = RecordId::generate();
        let mut stored = record.clone();
        stored.set_id(id.clone());

        let row = sqlx::query(
            r#"
            INSERT INTO tracking_records (id, kind, document)
            VALUES ($1, $2, $3)
            RETURNING document
            "#,
        )
        .bind(id.as_str())
        .bind(Self::kind())
        .bind(stored.to_json())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("insert record", e))?;

        row.map(row_to_record).transpose()
    }

    async fn find_by_filter(
        &self,
        filter: &RecordFilter,
        pagination: Pagination,
        sort: &Sort,
    ) -> Result<Vec<R>, DomainError> {
        // $2 is bound either way so the placeholder numbering stays fixed.
        let sql = format!(
            r#"
            SELECT document FROM tracking_records
            WHERE kind = $1 AND {}
            {}
            LIMIT $4 OFFSET $5
            "#,
            filter_clause(filter, 3),
            order_clause(sort)
        );

        let rows = sqlx::query(&sql)
            .bind(Self::kind())
            .bind(&sort.field)
            .bind(filter.to_document())
            .bind(pagination.limit as i64)
            .bind(pagination.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("fetch records", e))?;

        rows.into_iter().map(row_to_record).collect()
    }

    async fn find_one(&self, filter: &RecordFilter) -> Result<Option<R>, DomainError> {
        let sql = format!(
            r#"
            SELECT document FROM tracking_records
            WHERE kind = $1 AND {}
            ORDER BY created_at
            LIMIT 1
            "#,
            filter_clause(filter, 2)
        );
        let row = sqlx::query(&sql)
            .bind(Self::kind())
            .bind(filter.to_document())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("fetch record", e))?;

        row.map(row_to_record).transpose()
    }

    async fn update(&self, record: &R) -> Result<Option<R>, DomainError> {
        let Some(id) = record.id() else {
            return Ok(None);
        };

        let row = sqlx::query(
            r#"
            UPDATE tracking_records SET document = $3
            WHERE id = $1 AND kind = $2
            RETURNING document
            "#,
        )
        .bind(id)
        .bind(Self::kind())
        .bind(record.to_json())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("update record", e))?;

        row.map(row_to_record).transpose()
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM tracking_records WHERE id = $1 AND kind = $2")
            .bind(id)
            .bind(Self::kind())
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("delete record", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, filter: &RecordFilter) -> Result<u64, DomainError> {
        let sql = format!(
            "SELECT COUNT(*) FROM tracking_records WHERE kind = $1 AND {}",
            filter_clause(filter, 2)
        );
        let result: (i64,) = sqlx::query_as(&sql)
            .bind(Self::kind())
            .bind(filter.to_document())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error("count records", e))?;

        Ok(result.0.max(0) as u64)
    }
}
