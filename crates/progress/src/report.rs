//! Daily report composition.
//!
//! Combines the day's first and last tally with the stored history into the
//! summary posted to the channel and the record to append to the store.

use chrono::Duration;
use tally_core::{DailyDeltaRecord, GoalSpec, ProjectionResult, Time};
use tracing::debug;

use crate::projection::project;
use crate::velocity::average_velocity;

/// Number of most recent days averaged for the velocity line.
pub const DEFAULT_VELOCITY_WINDOW: usize = 30;

/// Output of one report cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReport {
    /// Message text to post
    pub summary_text: String,

    /// Record to persist for the day just finished
    pub record: DailyDeltaRecord,

    /// A thousand boundary was crossed within the day
    pub celebrate: bool,

    /// Highest multiple of 1000 not above the latest value
    pub past_thousands_goal: i64,

    /// Rolling average delta, absent when there was no history to average
    pub average_velocity: Option<f64>,

    /// Projection against the goal
    pub projection: ProjectionResult,
}

/// Builds the daily report for a fixed goal.
#[derive(Debug, Clone)]
pub struct DailyReportComposer {
    goal: GoalSpec,
    velocity_window: usize,
}

impl DailyReportComposer {
    /// Create a composer for `goal` with the default velocity window.
    pub fn new(goal: GoalSpec) -> Self {
        Self {
            goal,
            velocity_window: DEFAULT_VELOCITY_WINDOW,
        }
    }

    /// Override the number of days averaged.
    pub fn with_velocity_window(mut self, window: usize) -> Self {
        self.velocity_window = window;
        self
    }

    /// The goal this composer projects against.
    pub fn goal(&self) -> &GoalSpec {
        &self.goal
    }

    /// Compose the report.
    ///
    /// `oldest` is the value standing when the day began, `latest` the most
    /// recent value, `history` the previously stored records (any order).
    /// The new record is dated the day before `now` and is included in the
    /// average.
    pub fn compose(
        &self,
        oldest: i64,
        latest: i64,
        history: &[DailyDeltaRecord],
        now: Time,
    ) -> DailyReport {
        // Saturates rather than wrapping for values near the i64 limits.
        let delta = latest.saturating_sub(oldest);
        let record = DailyDeltaRecord::new((now - Duration::days(1)).date_naive(), delta, oldest);

        let mut window = Vec::with_capacity(history.len() + 1);
        window.push(record.clone());
        window.extend_from_slice(history);
        let average_velocity = average_velocity(&window, self.velocity_window).ok();

        let projection = project(&self.goal, now, latest);

        let past_thousands_goal = latest.div_euclid(1000) * 1000;
        let celebrate = past_thousands_goal > oldest && past_thousands_goal <= latest;

        debug!(
            oldest,
            latest,
            delta,
            celebrate,
            days_remaining = projection.days_remaining,
            "Composed daily report"
        );

        let summary_text = self.render(
            oldest,
            latest,
            delta,
            average_velocity,
            &projection,
            celebrate,
            past_thousands_goal,
        );

        DailyReport {
            summary_text,
            record,
            celebrate,
            past_thousands_goal,
            average_velocity,
            projection,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render(
        &self,
        oldest: i64,
        latest: i64,
        delta: i64,
        average_velocity: Option<f64>,
        projection: &ProjectionResult,
        celebrate: bool,
        past_thousands_goal: i64,
    ) -> String {
        let rate = projection.required_daily_rate;
        let mut lines = Vec::new();

        if celebrate {
            lines.push(format!(
                ":tada: Congratulations! We've gone past {past_thousands_goal}! :tada:"
            ));
        }
        lines.push(format!("Today we've gone from *{oldest}* to *{latest}*!"));
        lines.push(format!("- :arrow_upper_right: The day's progress: *{delta:+}*"));
        if let Some(avg) = average_velocity {
            lines.push(format!(
                "- :chart_with_upwards_trend: Average daily speed: *{}*",
                avg.round() as i64
            ));
        }
        lines.push(format!(
            "- :round_pushpin: Our current goal is to reach *{}* by *{}.*",
            self.goal.target_value,
            self.goal.target_date.format("%B %-d")
        ));
        lines.push(format!(
            "- :calendar: If we want to get there on time, we need to count by at least *{:+}* a day.",
            rate.ceil() as i64
        ));
        lines.push(format!(
            "- :1234: Here's a number to aim for today: *{}*",
            (latest as f64 + rate).ceil() as i64
        ));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

    fn goal() -> GoalSpec {
        GoalSpec::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 300_000)
    }

    fn now() -> Time {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    }

    fn record(day: u32, delta: i64) -> DailyDeltaRecord {
        DailyDeltaRecord::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), delta, 0)
    }

    #[test]
    fn test_crossing_a_thousand_celebrates() {
        let report = DailyReportComposer::new(goal()).compose(998, 1005, &[], now());

        assert_eq!(report.record.delta, 7);
        assert_eq!(report.past_thousands_goal, 1000);
        assert!(report.celebrate);
        assert!(report
            .summary_text
            .starts_with(":tada: Congratulations! We've gone past 1000! :tada:"));
    }

    #[test]
    fn test_no_crossing_no_celebration() {
        let report = DailyReportComposer::new(goal()).compose(1001, 1005, &[], now());

        assert!(!report.celebrate);
        assert!(report.summary_text.starts_with("Today we've gone from *1001* to *1005*!"));
    }

    #[test]
    fn test_landing_exactly_on_boundary_celebrates() {
        let report = DailyReportComposer::new(goal()).compose(999, 1000, &[], now());
        assert!(report.celebrate);

        let report = DailyReportComposer::new(goal()).compose(1000, 1000, &[], now());
        assert!(!report.celebrate);
    }

    #[test]
    fn test_record_is_dated_yesterday() {
        let report = DailyReportComposer::new(goal()).compose(100, 150, &[], now());

        assert_eq!(report.record.date, NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
        assert_eq!(report.record.start_value, 100);
        assert_eq!(report.record.delta, 50);
    }

    #[test]
    fn test_average_includes_new_record() {
        let history = vec![record(13, 10), record(12, 20)];
        let report = DailyReportComposer::new(goal()).compose(100, 130, &history, now());

        assert_eq!(report.average_velocity, Some(20.0));
        assert!(report.summary_text.contains("Average daily speed: *20*"));
    }

    #[test]
    fn test_velocity_window_limits_history() {
        let history = vec![record(13, 10), record(12, 1000)];
        let report = DailyReportComposer::new(goal())
            .with_velocity_window(2)
            .compose(100, 130, &history, now());

        assert_eq!(report.average_velocity, Some(20.0));
    }

    #[test]
    fn test_projection_lines() {
        // 2024-01-15 -> 2024-03-01 is 46 days.
        let now = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_time(NaiveTime::MIN)
            .and_utc();
        let report = DailyReportComposer::new(goal()).compose(149_000, 150_000, &[], now);

        assert_eq!(report.projection.days_remaining, 46);
        // 150000 / 46 = 3260.87 -> 3261
        assert!(report.summary_text.contains("count by at least *+3261* a day"));
        assert!(report.summary_text.contains("aim for today: *153261*"));
        assert!(report.summary_text.contains("reach *300000* by *March 1.*"));
    }

    #[test]
    fn test_extreme_tally_saturates_delta() {
        // First post of the day was 0, so the day started at -1.
        let report = DailyReportComposer::new(goal()).compose(-1, i64::MAX, &[], now());

        assert_eq!(report.record.delta, i64::MAX);
        assert_eq!(report.record.start_value, -1);
        assert!(report.summary_text.contains(&format!("*{:+}*", i64::MAX)));
    }

    #[test]
    fn test_large_history_averages_without_overflow() {
        let history = vec![record(13, 5_000_000_000_000_000_000)];
        let report = DailyReportComposer::new(goal())
            .compose(-1, 4_999_999_999_999_999_999, &history, now());

        assert_eq!(report.average_velocity, Some(5e18));
    }

    #[test]
    fn test_negative_delta_is_signed() {
        let report = DailyReportComposer::new(goal()).compose(500, 490, &[], now());
        assert!(report.summary_text.contains("The day's progress: *-10*"));
    }
}
