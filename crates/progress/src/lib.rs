//! Counting & projection engine.
//!
//! Tally extraction, milestone classification, velocity, goal projection
//! and the daily report. Everything here is pure: no I/O, no clocks read
//! behind the caller's back.

#![warn(missing_docs)]

pub mod error;
pub mod extractor;
pub mod milestone;
pub mod velocity;
pub mod projection;
pub mod report;

pub use error::{ProgressError, Result};
pub use extractor::{extract, looks_like_tally, parse_tally};
pub use milestone::classify;
pub use velocity::average_velocity;
pub use projection::project;
pub use report::{DailyReport, DailyReportComposer, DEFAULT_VELOCITY_WINDOW};
