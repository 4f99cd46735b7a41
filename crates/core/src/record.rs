//! Daily delta record - one row of counting history per day.

use serde::{Deserialize, Serialize};
use crate::id::RecordId;
use crate::CalendarDate;

/// How much the tally grew over one calendar day.
///
/// Records are append-only: once written they are never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyDeltaRecord {
    /// Unique identifier
    pub id: RecordId,

    /// Day the delta covers
    pub date: CalendarDate,

    /// Latest value minus the value standing at the start of the day
    pub delta: i64,

    /// Value standing at the start of the day
    pub start_value: i64,
}

impl DailyDeltaRecord {
    /// Create a new record with a fresh id.
    pub fn new(date: CalendarDate, delta: i64, start_value: i64) -> Self {
        Self {
            id: RecordId::new(),
            date,
            delta,
            start_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_record_json_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let record = DailyDeltaRecord::new(date, 42, 1000);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["date"], "2024-01-15");
        assert_eq!(json["delta"], 42);
        assert_eq!(json["start_value"], 1000);
    }
}
