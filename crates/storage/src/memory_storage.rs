//! In-memory record store, for tests and dry runs.

use async_trait::async_trait;
use tally_core::DailyDeltaRecord;

use super::trait_::select_recent;
use super::{RecordStore, Result, SortOrder};

/// Record store backed by a `Vec`. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Vec<DailyDeltaRecord>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `records`.
    pub fn with_records(records: Vec<DailyDeltaRecord>) -> Self {
        Self { records }
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[DailyDeltaRecord] {
        &self.records
    }
}

#[async_trait]
impl RecordStore for MemoryStorage {
    async fn append_record(&mut self, record: &DailyDeltaRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    async fn query_recent(&self, max_count: usize, order: SortOrder) -> Result<Vec<DailyDeltaRecord>> {
        Ok(select_recent(self.records.clone(), max_count, order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, delta: i64) -> DailyDeltaRecord {
        DailyDeltaRecord::new(NaiveDate::from_ymd_opt(2024, 2, day).unwrap(), delta, 0)
    }

    #[tokio::test]
    async fn test_query_recent_descending() {
        let mut storage = MemoryStorage::new();
        for (day, delta) in [(3, 30), (1, 10), (2, 20)] {
            storage.append_record(&record(day, delta)).await.unwrap();
        }

        let recent = storage.query_recent(2, SortOrder::Descending).await.unwrap();
        let deltas: Vec<_> = recent.iter().map(|r| r.delta).collect();
        assert_eq!(deltas, vec![30, 20]);
    }

    #[tokio::test]
    async fn test_query_recent_ascending() {
        let storage = MemoryStorage::with_records(vec![record(2, 20), record(1, 10)]);

        let all = storage.query_recent(10, SortOrder::Ascending).await.unwrap();
        let deltas: Vec<_> = all.iter().map(|r| r.delta).collect();
        assert_eq!(deltas, vec![10, 20]);
    }
}
