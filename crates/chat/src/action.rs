//! Requested chat side effects and their best-effort execution.

use futures::future::join_all;
use tally_core::{MilestoneSet, RawMessage};
use tracing::{debug, warn};

use crate::client::ChatClient;
use crate::error::Result;

/// A side effect the bot wants performed on the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    /// Add an emoji reaction to a message
    React {
        /// Channel id
        channel: String,
        /// Message timestamp
        timestamp: String,
        /// Emoji name without colons
        emoji: String,
    },
    /// Pin a message
    Pin {
        /// Channel id
        channel: String,
        /// Message timestamp
        timestamp: String,
    },
    /// Post a new message
    Post {
        /// Channel id
        channel: String,
        /// Message text
        text: String,
    },
}

impl ChatAction {
    /// Actions requested by the milestones a message matched.
    pub fn for_milestones(message: &RawMessage, milestones: &MilestoneSet) -> Vec<ChatAction> {
        let mut actions = Vec::new();
        for milestone in milestones {
            if let Some(emoji) = milestone.reaction() {
                actions.push(ChatAction::React {
                    channel: message.channel_id.clone(),
                    timestamp: message.timestamp_id.clone(),
                    emoji: emoji.to_string(),
                });
            }
            if milestone.pins() {
                actions.push(ChatAction::Pin {
                    channel: message.channel_id.clone(),
                    timestamp: message.timestamp_id.clone(),
                });
            }
        }
        actions
    }

    /// Post `text` to `channel`.
    pub fn post(channel: impl Into<String>, text: impl Into<String>) -> Self {
        ChatAction::Post {
            channel: channel.into(),
            text: text.into(),
        }
    }

    async fn perform<C: ChatClient + ?Sized>(&self, client: &C) -> Result<()> {
        match self {
            ChatAction::React { channel, timestamp, emoji } => {
                client.add_reaction(channel, timestamp, emoji).await
            }
            ChatAction::Pin { channel, timestamp } => client.pin_message(channel, timestamp).await,
            ChatAction::Post { channel, text } => client.post_message(channel, text).await,
        }
    }
}

/// Outcome of a [`dispatch`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Actions attempted
    pub attempted: usize,
    /// Actions that failed (already logged)
    pub failed: usize,
}

impl DispatchSummary {
    /// Whether every action went through.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Run every action concurrently, each in its own failure boundary.
///
/// Failures are logged and counted, never returned: one failing reaction
/// must not stop a pin or a post.
pub async fn dispatch<C: ChatClient + ?Sized>(client: &C, actions: &[ChatAction]) -> DispatchSummary {
    let outcomes = join_all(actions.iter().map(|action| async move {
        match action.perform(client).await {
            Ok(()) => {
                debug!("Chat action done: {:?}", action);
                true
            }
            Err(e) => {
                warn!("Chat action {:?} failed: {}", action, e);
                false
            }
        }
    }))
    .await;

    DispatchSummary {
        attempted: outcomes.len(),
        failed: outcomes.iter().filter(|ok| !**ok).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingChatClient;
    use tally_core::MilestoneEvent;

    fn message() -> RawMessage {
        RawMessage::new("C1", "1700000000.000100", "5000")
    }

    #[test]
    fn test_five_thousand_reacts_and_pins() {
        let milestones: MilestoneSet =
            [MilestoneEvent::ThousandCrossed, MilestoneEvent::FiveThousandCrossed].into();
        let actions = ChatAction::for_milestones(&message(), &milestones);

        assert_eq!(
            actions,
            vec![
                ChatAction::React {
                    channel: "C1".into(),
                    timestamp: "1700000000.000100".into(),
                    emoji: "tada".into(),
                },
                ChatAction::Pin {
                    channel: "C1".into(),
                    timestamp: "1700000000.000100".into(),
                },
            ]
        );
    }

    #[test]
    fn test_no_milestones_no_actions() {
        assert!(ChatAction::for_milestones(&message(), &MilestoneSet::new()).is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_continues_after_failure() {
        let client = RecordingChatClient::new().failing("reactions.add");
        let actions = vec![
            ChatAction::React {
                channel: "C1".into(),
                timestamp: "1.0".into(),
                emoji: "tada".into(),
            },
            ChatAction::Pin {
                channel: "C1".into(),
                timestamp: "1.0".into(),
            },
            ChatAction::post("C1", "hello"),
        ];

        let summary = dispatch(&client, &actions).await;

        assert_eq!(summary, DispatchSummary { attempted: 3, failed: 1 });
        assert!(!summary.all_succeeded());
        let performed = client.performed();
        assert_eq!(performed.len(), 2);
        assert!(performed.contains(&ChatAction::post("C1", "hello")));
    }

    #[tokio::test]
    async fn test_dispatch_nothing() {
        let client = RecordingChatClient::new();
        let summary = dispatch(&client, &[]).await;
        assert_eq!(summary, DispatchSummary::default());
        assert!(summary.all_succeeded());
    }
}
