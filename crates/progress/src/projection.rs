//! Goal projection.

use chrono::NaiveTime;
use tally_core::{GoalSpec, ProjectionResult, Time};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Project `current_value` onto the goal as seen from `now`.
///
/// The goal date is taken as midnight UTC. The distance to it is absolute,
/// so a goal date in the past keeps counting days (backwards) instead of
/// reporting zero. The rate is unrounded; formatting rounds.
pub fn project(goal: &GoalSpec, now: Time, current_value: i64) -> ProjectionResult {
    let target = goal.target_date.and_time(NaiveTime::MIN).and_utc();
    let distance_ms = (target - now).abs().num_milliseconds();
    let days_remaining = (distance_ms + DAY_MS - 1) / DAY_MS;

    let remaining = (i128::from(goal.target_value) - i128::from(current_value)) as f64;
    let required_daily_rate = if days_remaining == 0 {
        // Exactly at the target instant: everything left is due now.
        remaining
    } else {
        remaining / days_remaining as f64
    };

    ProjectionResult {
        days_remaining,
        required_daily_rate,
    }
}
