//! In-process chat client that records what it was asked to do.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use tally_core::{RawMessage, Time};

use crate::action::ChatAction;
use crate::client::ChatClient;
use crate::error::{ChatError, Result};

/// Chat client double: serves a fixed history and records side effects.
///
/// Methods listed with [`failing`](Self::failing) return an API error
/// using Slack method names (`conversations.history`, `chat.postMessage`,
/// `reactions.add`, `pins.add`).
#[derive(Debug, Default)]
pub struct RecordingChatClient {
    history: Vec<RawMessage>,
    failing: HashSet<&'static str>,
    performed: Mutex<Vec<ChatAction>>,
}

impl RecordingChatClient {
    /// Empty history, nothing failing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `history` (newest first).
    pub fn with_history(mut self, history: Vec<RawMessage>) -> Self {
        self.history = history;
        self
    }

    /// Make `method` fail.
    pub fn failing(mut self, method: &'static str) -> Self {
        self.failing.insert(method);
        self
    }

    /// Side effects that succeeded, in completion order.
    pub fn performed(&self) -> Vec<ChatAction> {
        self.performed.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Texts successfully posted.
    pub fn posted(&self) -> Vec<String> {
        self.performed()
            .into_iter()
            .filter_map(|a| match a {
                ChatAction::Post { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn check(&self, method: &str) -> Result<()> {
        if self.failing.contains(method) {
            Err(ChatError::api(method, "mock_failure"))
        } else {
            Ok(())
        }
    }

    fn record(&self, method: &str, action: ChatAction) -> Result<()> {
        self.check(method)?;
        if let Ok(mut performed) = self.performed.lock() {
            performed.push(action);
        }
        Ok(())
    }
}

fn ts_seconds(ts: &str) -> f64 {
    ts.parse().unwrap_or(0.0)
}

#[async_trait]
impl ChatClient for RecordingChatClient {
    async fn fetch_recent_messages(&self, _channel: &str, limit: usize) -> Result<Vec<RawMessage>> {
        self.check("conversations.history")?;
        Ok(self.history.iter().take(limit).cloned().collect())
    }

    async fn fetch_messages_since(&self, _channel: &str, since: Time) -> Result<Vec<RawMessage>> {
        self.check("conversations.history")?;
        let boundary = since.timestamp() as f64;
        let mut messages: Vec<_> = self
            .history
            .iter()
            .filter(|m| ts_seconds(&m.timestamp_id) > boundary)
            .cloned()
            .collect();
        messages.reverse();
        Ok(messages)
    }

    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        self.record("chat.postMessage", ChatAction::post(channel, text))
    }

    async fn add_reaction(&self, channel: &str, timestamp: &str, emoji: &str) -> Result<()> {
        self.record(
            "reactions.add",
            ChatAction::React {
                channel: channel.to_string(),
                timestamp: timestamp.to_string(),
                emoji: emoji.to_string(),
            },
        )
    }

    async fn pin_message(&self, channel: &str, timestamp: &str) -> Result<()> {
        self.record(
            "pins.add",
            ChatAction::Pin {
                channel: channel.to_string(),
                timestamp: timestamp.to_string(),
            },
        )
    }
}
