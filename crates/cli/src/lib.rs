//! Tally bot: wires the counting engine to Slack, the record store and a
//! daily timer.

pub mod config;
pub mod events;
pub mod mention;
pub mod report;
pub mod scheduler;
pub mod server;

pub use config::{BotConfig, ConfigError};
pub use report::DailyReporter;
