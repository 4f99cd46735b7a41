//! Record store trait abstraction.

use async_trait::async_trait;
use tally_core::DailyDeltaRecord;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Record could not be written
    #[error("Write error: {0}")]
    Write(String),
}

/// Sort direction on the record date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first
    Ascending,
    /// Newest first
    #[default]
    Descending,
}

/// Append-only store of daily delta records.
///
/// Only the daily report job writes; anything may read.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append a record. Existing records are never touched.
    async fn append_record(&mut self, record: &DailyDeltaRecord) -> Result<()>;

    /// Up to `max_count` records, sorted by date in `order`.
    ///
    /// With `Descending` these are the most recent records.
    async fn query_recent(&self, max_count: usize, order: SortOrder) -> Result<Vec<DailyDeltaRecord>>;
}

/// Sort `records` by date in `order` and keep the first `max_count`.
///
/// Shared by the store implementations. Ties on date keep newer ids first
/// when descending.
pub(crate) fn select_recent(
    mut records: Vec<DailyDeltaRecord>,
    max_count: usize,
    order: SortOrder,
) -> Vec<DailyDeltaRecord> {
    records.sort_by(|a, b| (a.date, a.id).cmp(&(b.date, b.id)));
    if order == SortOrder::Descending {
        records.reverse();
    }
    records.truncate(max_count);
    records
}
