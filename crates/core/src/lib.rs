//! Tally bot core data models.
//!
//! This crate defines the data structures shared by the counting engine,
//! the chat and storage collaborators, and the bot binary.

#![warn(missing_docs)]

// Identities
mod id;

// Inputs
mod message;

// Goal and projection
mod goal;

// Daily history
mod record;

// Milestones
mod milestone;

// Re-exports
pub use id::RecordId;
pub use message::RawMessage;
pub use goal::{GoalSpec, ProjectionResult};
pub use record::DailyDeltaRecord;
pub use milestone::{MilestoneEvent, MilestoneSet};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Calendar date type (no time zone attached)
pub type CalendarDate = chrono::NaiveDate;
