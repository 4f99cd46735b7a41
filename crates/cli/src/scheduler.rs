//! Once-a-day timer.

use chrono::{Duration, NaiveTime, Utc};
use tally_core::Time;
use tracing::info;

use crate::report::DailyJob;

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Time;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Time {
        Utc::now()
    }
}

/// The first instant strictly after `now` whose UTC time of day is `at`.
pub fn next_run_after(now: Time, at: NaiveTime) -> Time {
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Run `job` every day at `at` (UTC), forever.
///
/// The job is handed the scheduled instant, not the wake-up time. Job
/// failures are the job's to log; the loop never retries. A cycle never
/// fires twice, even if the clock reads earlier than the last fired
/// instant after waking.
pub async fn run_daily<C: Clock, J: DailyJob>(clock: C, at: NaiveTime, mut job: J) {
    let mut last_fired: Option<Time> = None;
    loop {
        let now = clock.now();
        let base = last_fired.map_or(now, |fired| fired.max(now));
        let next = next_run_after(base, at);
        let wait = (next - now).to_std().unwrap_or_default();
        info!("Next daily report at {} (in {}s)", next, wait.as_secs());

        tokio::time::sleep(wait).await;
        job.run(next).await;
        last_fired = Some(next);
    }
}
