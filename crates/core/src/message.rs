//! Chat message model - what the chat platform hands us.

use serde::{Deserialize, Serialize};

/// A single chat message as delivered by the chat collaborator.
///
/// Read-only view; the core never constructs these except in tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Message body
    pub text: String,

    /// Platform timestamp that identifies the message within its channel
    pub timestamp_id: String,

    /// Channel the message was posted in
    pub channel_id: String,

    /// Platform subtype (edits, joins, bot posts); `None` for plain posts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

impl RawMessage {
    /// Create a plain (subtype-less) message.
    pub fn new(
        channel_id: impl Into<String>,
        timestamp_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            timestamp_id: timestamp_id.into(),
            channel_id: channel_id.into(),
            subtype: None,
        }
    }

    /// Whether this is an ordinary human post.
    pub fn is_plain(&self) -> bool {
        self.subtype.is_none()
    }
}
