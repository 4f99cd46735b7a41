//! Real-time tally posts: classify and react.

use tally_chat::{dispatch, ChatAction, ChatClient, DispatchSummary};
use tally_core::RawMessage;
use tally_progress::{classify, looks_like_tally, parse_tally};
use tracing::debug;

/// Actions a freshly posted message asks for.
///
/// Only plain posts that start with a digit and carry a valid tally are
/// considered. Pure, so the same message always yields the same actions.
pub fn tally_actions(message: &RawMessage) -> Vec<ChatAction> {
    if !message.is_plain() || !looks_like_tally(&message.text) {
        return Vec::new();
    }
    let Some(value) = parse_tally(&message.text) else {
        return Vec::new();
    };

    let milestones = classify(value);
    if !milestones.is_empty() {
        debug!(value, ?milestones, ts = %message.timestamp_id, "Milestone hit");
    }
    ChatAction::for_milestones(message, &milestones)
}

/// React to a posted message. Failures are logged by [`dispatch`].
pub async fn handle_message<C: ChatClient + ?Sized>(client: &C, message: &RawMessage) -> DispatchSummary {
    let actions = tally_actions(message);
    dispatch(client, &actions).await
}
