//! Record repository port - persistence for every tracked record kind.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::records::{RecordFilter, TrackedRecord};

/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: MAX_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    /// Clamps out-of-range values into `page >= 1`, `1 <= limit <= 100`.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(MAX_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Number of records to skip.
    pub fn offset(&self) -> usize {
        ((self.page - 1) as usize) * self.limit as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort order of a listing. `field == "created_at"` means insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            field: "created_at".to_string(),
            direction: SortDirection::Descending,
        }
    }
}

impl Sort {
    /// Parses `field` (ascending) or `-field` (descending).
    ///
    /// Only plain identifiers are accepted since the field name may end up
    /// in a query.
    pub fn parse(value: &str) -> Option<Self> {
        let (direction, field) = match value.strip_prefix('-') {
            Some(rest) => (SortDirection::Descending, rest),
            None => (SortDirection::Ascending, value.strip_prefix('+').unwrap_or(value)),
        };
        let valid = !field.is_empty()
            && field
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        valid.then(|| Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// Persistence port consumed by the record handlers.
///
/// Implementations must tolerate concurrent calls from simultaneous requests.
#[async_trait]
pub trait RecordRepository<R: TrackedRecord>: Send + Sync {
    /// Whether any stored record matches `filter`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    async fn exists(&self, filter: &RecordFilter) -> Result<bool, DomainError>;

    /// Stores a new record and returns it with its identifier assigned.
    ///
    /// `Ok(None)` means the store accepted the call but produced no record.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` on a unique-key violation, `InvalidFormat` when the
    /// store rejects a value's shape, `DatabaseError` otherwise.
    async fn create(&self, record: &R) -> Result<Option<R>, DomainError>;

    /// Records matching `filter`, sorted and paginated.
    async fn find_by_filter(
        &self,
        filter: &RecordFilter,
        pagination: Pagination,
        sort: &Sort,
    ) -> Result<Vec<R>, DomainError>;

    /// First record matching `filter`.
    async fn find_one(&self, filter: &RecordFilter) -> Result<Option<R>, DomainError>;

    /// Replaces the stored record with the same id. `Ok(None)` when no such record exists.
    async fn update(&self, record: &R) -> Result<Option<R>, DomainError>;

    /// Deletes by id; `false` when nothing was deleted.
    async fn delete_by_id(&self, id: &str) -> Result<bool, DomainError>;

    async fn count(&self, filter: &RecordFilter) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sleep::Sleep;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn RecordRepository<Sleep>) {}

    #[test]
    fn pagination_defaults_to_first_full_page() {
        let p = Pagination::default();
        assert_eq!((p.page, p.limit), (1, 100));
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn pagination_clamps_out_of_range_values() {
        let p = Pagination::new(Some(0), Some(1_000));
        assert_eq!((p.page, p.limit), (1, 100));
        assert_eq!(Pagination::new(Some(3), Some(0)).limit, 1);
    }

    #[test]
    fn pagination_offset_skips_previous_pages() {
        assert_eq!(Pagination::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn sort_parses_direction_prefix() {
        let desc = Sort::parse("-start_time").unwrap();
        assert_eq!(desc.field, "start_time");
        assert_eq!(desc.direction, SortDirection::Descending);

        let asc = Sort::parse("duration").unwrap();
        assert_eq!(asc.direction, SortDirection::Ascending);
    }

    #[test]
    fn sort_rejects_non_identifiers() {
        assert!(Sort::parse("-").is_none());
        assert!(Sort::parse("start_time;drop").is_none());
    }
}
