//! Replies for when someone @-mentions the bot.

use rand::seq::SliceRandom;
use rand::Rng;
use tally_chat::{ChatClient, Result};
use tracing::info;

/// The bot is a vampire who would rather be asleep.
pub const MENTION_REPLIES: [&str; 7] = [
    "DO NOT BOTHER ME. I AM SLEEPING.",
    "AAAAAAAA!!! THE SUN! *pulls curtains closed* I nearly got _burnt_ that time, you pathetic little minions! Next time, DO NOT WAKE ME.",
    "What do you want, human weakling?",
    "Hrmh? Is Count von Corgo pissing on the lawn _again_?",
    "What is it? Are you going too slow that you need another supernatural being to help you _speed-count_? If so, you've found the wrong one, because this supernatural being is _trying to sleep!_",
    "HISSSSSSSSSSS!",
    "Minions, I had _three hours_ of sleep yesterday, and I am trying to catch up. Please, _leave me alone to sleep._",
];

/// Pick a reply.
pub fn pick_reply<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    MENTION_REPLIES.choose(rng).copied().unwrap_or(MENTION_REPLIES[0])
}

/// Answer a mention in `channel`.
pub async fn handle_mention<C: ChatClient + ?Sized>(client: &C, channel: &str) -> Result<()> {
    let reply = pick_reply(&mut rand::thread_rng());
    client.post_message(channel, reply).await?;
    info!("App mentioned in {}", channel);
    Ok(())
}
