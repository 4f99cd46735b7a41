//! Chat platform collaborator.
//!
//! The [`ChatClient`] trait is everything the bot needs from the chat
//! platform; [`SlackClient`] implements it over the Slack Web API.
//! Side effects are described as [`ChatAction`] values and executed by
//! [`dispatch`], which never lets one failure stop the others.

#![warn(missing_docs)]

pub mod error;
pub mod client;
pub mod slack;
pub mod action;
pub mod history;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use error::{ChatError, Result};
pub use client::ChatClient;
pub use slack::{SlackClient, SlackConfig};
pub use action::{dispatch, ChatAction, DispatchSummary};
pub use history::{day_window_start, latest_tally, oldest_tally};
