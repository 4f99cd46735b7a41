//! Chat client trait abstraction.

use async_trait::async_trait;
use tally_core::{RawMessage, Time};

use crate::error::Result;

/// What the bot needs from the chat platform.
///
/// Every call is independent and safe to retry; implementations apply
/// their own timeouts.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Up to `limit` most recent messages, newest first.
    async fn fetch_recent_messages(&self, channel: &str, limit: usize) -> Result<Vec<RawMessage>>;

    /// Messages posted strictly after `since`, oldest first.
    async fn fetch_messages_since(&self, channel: &str, since: Time) -> Result<Vec<RawMessage>>;

    /// Post a message to a channel.
    async fn post_message(&self, channel: &str, text: &str) -> Result<()>;

    /// Add an emoji reaction to a message.
    async fn add_reaction(&self, channel: &str, timestamp: &str, emoji: &str) -> Result<()>;

    /// Pin a message.
    async fn pin_message(&self, channel: &str, timestamp: &str) -> Result<()>;
}
