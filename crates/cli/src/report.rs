//! The daily report job.
//!
//! Resolves the day's range from channel history, composes the report,
//! appends the day's record and posts the summary. Every collaborator call
//! is best effort: a failed write still posts, a failed post still writes.

use std::sync::Arc;

use async_trait::async_trait;
use tally_chat::{day_window_start, dispatch, latest_tally, oldest_tally, ChatAction, ChatClient};
use tally_core::Time;
use tally_progress::{DailyReport, DailyReportComposer};
use tally_storage::{RecordStore, SortOrder};
use tracing::{error, info, warn};

use crate::config::BotConfig;

/// A job the scheduler fires once a day.
#[async_trait]
pub trait DailyJob: Send {
    /// Run the job for the cycle scheduled at `now`.
    async fn run(&mut self, now: Time);
}

/// Produces and publishes the daily report.
pub struct DailyReporter<C: ChatClient, S: RecordStore> {
    client: Arc<C>,
    store: S,
    composer: DailyReportComposer,
    channel: String,
    history_limit: usize,
    velocity_window: usize,
}

impl<C: ChatClient, S: RecordStore> DailyReporter<C, S> {
    /// Create a reporter posting to the configured channel.
    pub fn new(client: Arc<C>, store: S, config: &BotConfig) -> Self {
        Self {
            client,
            store,
            composer: DailyReportComposer::new(config.goal())
                .with_velocity_window(config.report.velocity_window),
            channel: config.channel.clone(),
            history_limit: config.report.history_limit,
            velocity_window: config.report.velocity_window,
        }
    }

    /// The record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Compose the report without writing or posting anything.
    ///
    /// `None` when the day's range could not be resolved.
    pub async fn prepare(&self, now: Time) -> Option<DailyReport> {
        let latest = match latest_tally(&*self.client, &self.channel, self.history_limit).await {
            Ok(Some(latest)) => latest,
            Ok(None) => {
                warn!(
                    "No tally in the last {} messages of {}; skipping report",
                    self.history_limit, self.channel
                );
                return None;
            }
            Err(e) => {
                error!("Failed to fetch latest tally: {}", e);
                return None;
            }
        };

        let oldest = match oldest_tally(&*self.client, &self.channel, day_window_start(now)).await {
            Ok(Some(oldest)) => oldest,
            Ok(None) => {
                info!("Nothing counted in the last 24 hours");
                latest
            }
            Err(e) => {
                error!("Failed to fetch the day's first tally: {}", e);
                return None;
            }
        };

        let history = match self
            .store
            .query_recent(self.velocity_window, SortOrder::Descending)
            .await
        {
            Ok(history) => history,
            Err(e) => {
                warn!("Failed to load daily history, averaging today only: {}", e);
                Vec::new()
            }
        };

        Some(self.composer.compose(oldest, latest, &history, now))
    }

    /// Compose, persist and post the report.
    pub async fn publish(&mut self, now: Time) -> Option<DailyReport> {
        info!("Writing daily report...");
        let report = self.prepare(now).await?;

        if let Err(e) = self.store.append_record(&report.record).await {
            warn!("Failed to store record for {}: {}", report.record.date, e);
        }

        let summary = dispatch(
            &*self.client,
            &[ChatAction::post(&self.channel, &report.summary_text)],
        )
        .await;
        if summary.all_succeeded() {
            info!("Sent daily report.");
        }

        Some(report)
    }
}

#[async_trait]
impl<C, S> DailyJob for DailyReporter<C, S>
where
    C: ChatClient + 'static,
    S: RecordStore + 'static,
{
    async fn run(&mut self, now: Time) {
        self.publish(now).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use tally_chat::mock::RecordingChatClient;
    use tally_core::{DailyDeltaRecord, RawMessage};
    use tally_storage::{MemoryStorage, Result as StorageResult, StorageError};

    /// Store whose writes always fail.
    struct BrokenStorage;

    #[async_trait]
    impl RecordStore for BrokenStorage {
        async fn append_record(&mut self, _record: &DailyDeltaRecord) -> StorageResult<()> {
            Err(StorageError::Write("disk full".to_string()))
        }
        async fn query_recent(&self, _max_count: usize, _order: SortOrder) -> StorageResult<Vec<DailyDeltaRecord>> {
            Err(StorageError::Write("disk unreadable".to_string()))
        }
    }

    fn now() -> Time {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    }

    fn config() -> BotConfig {
        let mut config = BotConfig::default();
        config.slack.token = "xoxb-test".to_string();
        config.channel = "C1".to_string();
        config
    }

    fn message(hours_ago: i64, text: &str) -> RawMessage {
        let ts = now().timestamp() - hours_ago * 3600;
        RawMessage::new("C1", format!("{ts}.000100"), text)
    }

    fn client() -> Arc<RecordingChatClient> {
        // Newest first; 30h ago is outside the window.
        Arc::new(RecordingChatClient::new().with_history(vec![
            message(1, "1005"),
            message(2, "1004 almost"),
            message(5, "nice work everyone"),
            message(20, "999"),
            message(30, "998"),
        ]))
    }

    #[tokio::test]
    async fn test_publish_posts_and_stores() {
        let client = client();
        let history = vec![DailyDeltaRecord::new(NaiveDate::from_ymd_opt(2024, 1, 13).unwrap(), 20, 978)];
        let mut reporter = DailyReporter::new(client.clone(), MemoryStorage::with_records(history), &config());

        let report = reporter.publish(now()).await.unwrap();

        // First tally in the window is 999, so the day started at 998.
        assert_eq!(report.record.delta, 7);
        assert_eq!(report.record.start_value, 998);
        assert_eq!(report.record.date, NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
        assert!(report.celebrate);
        assert_eq!(report.average_velocity, Some(13.5));

        assert_eq!(reporter.store().records().len(), 2);
        assert_eq!(client.posted(), vec![report.summary_text.clone()]);
    }

    #[tokio::test]
    async fn test_quiet_day_reports_zero_delta() {
        let client = Arc::new(RecordingChatClient::new().with_history(vec![message(30, "1200")]));
        let mut reporter = DailyReporter::new(client.clone(), MemoryStorage::new(), &config());

        let report = reporter.publish(now()).await.unwrap();
        assert_eq!(report.record.delta, 0);
        assert!(!report.celebrate);
        assert_eq!(client.posted().len(), 1);
    }

    #[tokio::test]
    async fn test_storage_failure_still_posts() {
        let client = client();
        let mut reporter = DailyReporter::new(client.clone(), BrokenStorage, &config());

        let report = reporter.publish(now()).await.unwrap();
        assert_eq!(report.average_velocity, Some(7.0));
        assert_eq!(client.posted().len(), 1);
    }

    #[tokio::test]
    async fn test_post_failure_still_stores() {
        let client = Arc::new(
            RecordingChatClient::new()
                .with_history(vec![message(1, "1005"), message(3, "1001")])
                .failing("chat.postMessage"),
        );
        let mut reporter = DailyReporter::new(client, MemoryStorage::new(), &config());

        assert!(reporter.publish(now()).await.is_some());
        assert_eq!(reporter.store().records().len(), 1);
    }

    #[tokio::test]
    async fn test_history_failure_skips_report() {
        let client = Arc::new(RecordingChatClient::new().failing("conversations.history"));
        let mut reporter = DailyReporter::new(client.clone(), MemoryStorage::new(), &config());

        assert!(reporter.publish(now()).await.is_none());
        assert!(reporter.store().records().is_empty());
        assert!(client.posted().is_empty());
    }

    #[tokio::test]
    async fn test_prepare_has_no_side_effects() {
        let client = client();
        let reporter = DailyReporter::new(client.clone(), MemoryStorage::new(), &config());

        assert!(reporter.prepare(now()).await.is_some());
        assert!(reporter.store().records().is_empty());
        assert!(client.performed().is_empty());
    }
}
