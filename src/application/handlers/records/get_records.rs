//! Query handlers for reading records: one by id, or a page of a subject's records.

use std::sync::Arc;

use crate::domain::records::{RecordError, RecordFilter, TrackedRecord};
use crate::domain::validation::validate_identifier_format;
use crate::ports::{Pagination, RecordRepository, Sort};

/// Query for one record of a subject.
#[derive(Debug, Clone)]
pub struct GetRecordQuery {
    pub record_id: String,
    pub subject_id: String,
}

pub struct GetRecordHandler<R: TrackedRecord> {
    repository: Arc<dyn RecordRepository<R>>,
}

impl<R: TrackedRecord> GetRecordHandler<R> {
    pub fn new(repository: Arc<dyn RecordRepository<R>>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetRecordQuery) -> Result<R, RecordError> {
        let kind = R::KIND;
        validate_identifier_format(&query.subject_id, kind.subject_field)?;
        validate_identifier_format(&query.record_id, kind.id_param)?;

        let filter = RecordFilter::new()
            .eq("id", query.record_id.as_str())
            .eq(kind.subject_field, query.subject_id.as_str());

        self.repository
            .find_one(&filter)
            .await?
            .ok_or_else(|| RecordError::not_found(kind.not_found()))
    }
}

/// Query for a page of a subject's records.
#[derive(Debug, Clone)]
pub struct ListRecordsQuery {
    pub subject_id: String,
    pub pagination: Pagination,
    pub sort: Sort,
}

impl ListRecordsQuery {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            pagination: Pagination::default(),
            sort: Sort::default(),
        }
    }
}

/// A page of records plus the subject's total record count.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRecordsResult<R> {
    pub items: Vec<R>,
    pub total: u64,
}

pub struct ListRecordsHandler<R: TrackedRecord> {
    repository: Arc<dyn RecordRepository<R>>,
}

impl<R: TrackedRecord> ListRecordsHandler<R> {
    pub fn new(repository: Arc<dyn RecordRepository<R>>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: ListRecordsQuery,
    ) -> Result<ListRecordsResult<R>, RecordError> {
        let kind = R::KIND;
        validate_identifier_format(&query.subject_id, kind.subject_field)?;

        let filter = RecordFilter::new().eq(kind.subject_field, query.subject_id.as_str());
        let items = self
            .repository
            .find_by_filter(&filter, query.pagination, &query.sort)
            .await?;
        let total = self.repository.count(&filter).await?;

        Ok(ListRecordsResult { items, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRecordStore;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::log::{Log, LogType};

    const CHILD: &str = "5a62be07de34500146d9c544";
    const OTHER_CHILD: &str = "5a62be07d6f33400146c9b61";

    async fn seeded_store() -> InMemoryRecordStore<Log> {
        let store = InMemoryRecordStore::<Log>::new();
        for (day, child) in [
            ("2018-03-10", CHILD),
            ("2018-03-11", CHILD),
            ("2018-03-12", CHILD),
            ("2018-03-10", OTHER_CHILD),
        ] {
            store
                .create(&Log::new(day, LogType::Steps, 100.0, child))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn get_returns_record_of_subject() {
        let store = seeded_store().await;
        let first = store.all().await.remove(0);
        let handler = GetRecordHandler::new(Arc::new(store));

        let found = handler
            .handle(GetRecordQuery {
                record_id: first.id().unwrap().to_string(),
                subject_id: CHILD.to_string(),
            })
            .await
            .unwrap();

        assert_eq!(found, first);
    }

    #[tokio::test]
    async fn get_with_wrong_subject_is_not_found() {
        let store = seeded_store().await;
        let first = store.all().await.remove(0);
        let handler = GetRecordHandler::new(Arc::new(store));

        let err = handler
            .handle(GetRecordQuery {
                record_id: first.id().unwrap().to_string(),
                subject_id: OTHER_CHILD.to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Log not found!");
    }

    #[tokio::test]
    async fn get_rejects_malformed_record_id() {
        let handler = GetRecordHandler::new(Arc::new(seeded_store().await));

        let err = handler
            .handle(GetRecordQuery {
                record_id: "xyz".to_string(),
                subject_id: CHILD.to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidFormat);
    }

    #[tokio::test]
    async fn list_pages_through_subject_records() {
        let handler = ListRecordsHandler::new(Arc::new(seeded_store().await));

        let mut query = ListRecordsQuery::new(CHILD);
        query.pagination = Pagination::new(Some(1), Some(2));
        let page = handler.handle(query).await.unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 2);
        // newest first by default
        assert_eq!(page.items[0].date.value().map(String::as_str), Some("2018-03-12"));
    }

    #[tokio::test]
    async fn list_rejects_malformed_subject() {
        let handler = ListRecordsHandler::new(Arc::new(seeded_store().await));

        let err = handler.handle(ListRecordsQuery::new("child")).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
