//! Resolving the day's first and latest tally from channel history.

use chrono::Duration;
use tally_core::Time;
use tally_progress::parse_tally;
use tracing::debug;

use crate::client::ChatClient;
use crate::error::Result;

/// The most recent tally among the last `limit` messages.
///
/// Messages without a leading number are skipped. `Ok(None)` when none of
/// them carries a tally.
pub async fn latest_tally<C: ChatClient + ?Sized>(
    client: &C,
    channel: &str,
    limit: usize,
) -> Result<Option<i64>> {
    let messages = client.fetch_recent_messages(channel, limit).await?;
    let latest = messages.iter().find_map(|m| parse_tally(&m.text));
    debug!(?latest, scanned = messages.len(), "Resolved latest tally");
    Ok(latest)
}

/// The value standing when the window began: the first tally posted after
/// `since`, minus one.
///
/// `Ok(None)` when nothing numeric was posted after `since`.
pub async fn oldest_tally<C: ChatClient + ?Sized>(
    client: &C,
    channel: &str,
    since: Time,
) -> Result<Option<i64>> {
    let messages = client.fetch_messages_since(channel, since).await?;
    let first = messages.iter().find_map(|m| parse_tally(&m.text));
    debug!(?first, scanned = messages.len(), "Resolved first tally of the window");
    Ok(first.map(|v| v - 1))
}

/// Start of the trailing 24-hour window ending at `now`.
pub fn day_window_start(now: Time) -> Time {
    now - Duration::hours(24)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingChatClient;
    use chrono::{TimeZone, Utc};
    use tally_core::RawMessage;

    fn at(secs: i64, text: &str) -> RawMessage {
        RawMessage::new("C1", format!("{secs}.000100"), text)
    }

    fn client() -> RecordingChatClient {
        // Newest first.
        RecordingChatClient::new().with_history(vec![
            at(5_000, "good night all"),
            at(4_000, "1005"),
            at(3_000, "1004 - almost"),
            at(2_000, "what are we at?"),
            at(1_500, "1003"),
            at(1_000, "998"),
        ])
    }

    #[tokio::test]
    async fn test_latest_skips_chatter() {
        let latest = latest_tally(&client(), "C1", 100).await.unwrap();
        assert_eq!(latest, Some(1005));
    }

    #[tokio::test]
    async fn test_latest_absent_when_nothing_numeric() {
        let client = RecordingChatClient::new().with_history(vec![at(1, "hi"), at(0, "")]);
        assert_eq!(latest_tally(&client, "C1", 100).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_oldest_is_first_in_window_minus_one() {
        let since = Utc.timestamp_opt(1_200, 0).unwrap();
        let oldest = oldest_tally(&client(), "C1", since).await.unwrap();
        assert_eq!(oldest, Some(1002));
    }

    #[tokio::test]
    async fn test_oldest_absent_on_quiet_day() {
        let since = Utc.timestamp_opt(4_500, 0).unwrap();
        assert_eq!(oldest_tally(&client(), "C1", since).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_history_failure_propagates() {
        let client = client().failing("conversations.history");
        assert!(latest_tally(&client, "C1", 100).await.is_err());
    }

    #[test]
    fn test_day_window_start() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(day_window_start(now), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }
}
