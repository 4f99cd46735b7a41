//! Goal model - the fixed target the channel is counting towards.

use serde::{Deserialize, Serialize};
use crate::CalendarDate;

/// The goal: reach `target_value` by `target_date`.
///
/// Set once at startup and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSpec {
    /// Day by which the goal should be reached
    pub target_date: CalendarDate,

    /// Tally value to reach
    pub target_value: i64,
}

impl GoalSpec {
    /// Create a new goal.
    pub fn new(target_date: CalendarDate, target_value: i64) -> Self {
        Self {
            target_date,
            target_value,
        }
    }
}

/// Result of projecting the current tally onto the goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Whole days between now and the goal date (never negative)
    pub days_remaining: i64,

    /// Tally increase needed per day; negative once the goal is exceeded
    pub required_daily_rate: f64,
}
