//! Slack Web API client.
//!
//! Covers the handful of methods the bot uses: `conversations.history`,
//! `chat.postMessage`, `reactions.add` and `pins.add`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::json;
use tally_core::{RawMessage, Time};
use tracing::debug;

use crate::client::ChatClient;
use crate::error::{ChatError, Result};

/// Default Slack Web API endpoint.
pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

/// Largest page `conversations.history` should be asked for.
const MAX_PAGE_SIZE: usize = 200;

/// Stop paginating after this many pages.
const MAX_PAGES: usize = 50;

/// Slack client configuration.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Bot token (`xoxb-...`)
    pub token: String,
    /// API base URL
    pub api_base: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl SlackConfig {
    /// Configuration for `token` against the public API.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Slack Web API client.
#[derive(Clone)]
pub struct SlackClient {
    /// HTTP client
    client: Client,

    /// Bot token
    token: String,

    /// API base URL, without trailing slash
    api_base: String,
}

impl SlackClient {
    /// Create a new Slack client.
    pub fn new(config: SlackConfig) -> Result<Self> {
        let client = ClientBuilder::new().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            token: config.token,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    /// POST a JSON body to `method` and check Slack's `ok` flag.
    async fn call(&self, method: &str, body: serde_json::Value) -> Result<()> {
        let response = self
            .client
            .post(self.url(method))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let envelope: Envelope = response.json().await?;
        envelope.check(method)
    }

    /// One page of `conversations.history`.
    async fn history_page(
        &self,
        channel: &str,
        limit: usize,
        oldest: Option<&str>,
        cursor: Option<&str>,
    ) -> Result<HistoryResponse> {
        let mut query: Vec<(&str, String)> = vec![
            ("channel", channel.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(oldest) = oldest {
            query.push(("oldest", oldest.to_string()));
            query.push(("inclusive", "false".to_string()));
        }
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        let response = self
            .client
            .get(self.url("conversations.history"))
            .bearer_auth(&self.token)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;

        let page: HistoryResponse = response.json().await?;
        page.envelope.check("conversations.history")?;
        Ok(page)
    }
}

#[async_trait]
impl ChatClient for SlackClient {
    async fn fetch_recent_messages(&self, channel: &str, limit: usize) -> Result<Vec<RawMessage>> {
        let mut messages = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let want = limit.saturating_sub(messages.len()).min(MAX_PAGE_SIZE);
            if want == 0 {
                break;
            }
            let page = self.history_page(channel, want, None, cursor.as_deref()).await?;
            cursor = page.next_cursor();
            messages.extend(page.into_messages(channel));
            if cursor.is_none() {
                break;
            }
        }

        messages.truncate(limit);
        debug!("Fetched {} recent messages from {}", messages.len(), channel);
        Ok(messages)
    }

    async fn fetch_messages_since(&self, channel: &str, since: Time) -> Result<Vec<RawMessage>> {
        let oldest = format!("{}.{:06}", since.timestamp(), since.timestamp_subsec_micros());
        let mut messages = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let page = self
                .history_page(channel, MAX_PAGE_SIZE, Some(&oldest), cursor.as_deref())
                .await?;
            cursor = page.next_cursor();
            messages.extend(page.into_messages(channel));
            if cursor.is_none() {
                break;
            }
        }

        // Slack pages newest first.
        messages.reverse();
        debug!("Fetched {} messages since {} from {}", messages.len(), oldest, channel);
        Ok(messages)
    }

    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        self.call("chat.postMessage", json!({ "channel": channel, "text": text }))
            .await
    }

    async fn add_reaction(&self, channel: &str, timestamp: &str, emoji: &str) -> Result<()> {
        self.call(
            "reactions.add",
            json!({ "channel": channel, "timestamp": timestamp, "name": emoji }),
        )
        .await
    }

    async fn pin_message(&self, channel: &str, timestamp: &str) -> Result<()> {
        self.call("pins.add", json!({ "channel": channel, "timestamp": timestamp }))
            .await
    }
}

/// Fields present on every Slack Web API response.
#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl Envelope {
    fn check(&self, method: &str) -> Result<()> {
        if self.ok {
            Ok(())
        } else {
            Err(ChatError::api(
                method,
                self.error.clone().unwrap_or_else(|| "unknown_error".to_string()),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default)]
    messages: Vec<SlackMessage>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

#[derive(Debug, Deserialize)]
struct SlackMessage {
    #[serde(default)]
    text: String,
    ts: String,
    #[serde(default)]
    subtype: Option<String>,
}

impl HistoryResponse {
    fn next_cursor(&self) -> Option<String> {
        self.response_metadata
            .as_ref()
            .map(|m| m.next_cursor.clone())
            .filter(|c| !c.is_empty())
    }

    fn into_messages(self, channel: &str) -> Vec<RawMessage> {
        self.messages
            .into_iter()
            .map(|m| RawMessage {
                text: m.text,
                timestamp_id: m.ts,
                channel_id: channel.to_string(),
                subtype: m.subtype,
            })
            .collect()
    }
}
