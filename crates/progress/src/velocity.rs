//! Rolling average of daily deltas.

use tally_core::DailyDeltaRecord;
use crate::error::{ProgressError, Result};

/// Mean delta over the most recent `window` records (by date).
///
/// Divides by the number of records actually used, so a short history is
/// not diluted by the window size. Fails only when no records are usable.
pub fn average_velocity(records: &[DailyDeltaRecord], window: usize) -> Result<f64> {
    let mut recent: Vec<&DailyDeltaRecord> = records.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(window);

    if recent.is_empty() {
        return Err(ProgressError::InsufficientData);
    }

    // Widened so a long run of large deltas cannot overflow.
    let sum: i128 = recent.iter().map(|r| i128::from(r.delta)).sum();
    Ok(sum as f64 / recent.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, delta: i64) -> DailyDeltaRecord {
        DailyDeltaRecord::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), delta, 0)
    }

    #[test]
    fn test_divides_by_actual_count() {
        let records = vec![record(1, 10), record(2, 20)];
        assert_eq!(average_velocity(&records, 30).unwrap(), 15.0);
    }

    #[test]
    fn test_uses_most_recent_records() {
        // Unordered input; window keeps days 5 and 4.
        let records = vec![record(1, 1000), record(5, 10), record(3, 500), record(4, 30)];
        assert_eq!(average_velocity(&records, 2).unwrap(), 20.0);
    }

    #[test]
    fn test_sum_beyond_i64_does_not_overflow() {
        let records = vec![record(1, i64::MAX), record(2, i64::MAX)];
        assert_eq!(average_velocity(&records, 30).unwrap(), i64::MAX as f64);
    }

    #[test]
    fn test_empty_history_is_insufficient() {
        assert_eq!(average_velocity(&[], 30), Err(ProgressError::InsufficientData));
    }

    #[test]
    fn test_zero_window_is_insufficient() {
        assert_eq!(
            average_velocity(&[record(1, 5)], 0),
            Err(ProgressError::InsufficientData)
        );
    }
}
