//! Milestone model - numeric patterns worth celebrating.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A milestone pattern matched by a tally value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MilestoneEvent {
    /// Value is a multiple of 1000
    ThousandCrossed,
    /// Value is a multiple of 5000
    FiveThousandCrossed,
    /// Value ends in 69
    EndsIn69,
    /// Value ends in 666
    EndsIn666,
    /// Last three digits mirror the first three
    Palindromic,
}

impl MilestoneEvent {
    /// All milestone kinds, in classification order.
    pub const ALL: [MilestoneEvent; 5] = [
        MilestoneEvent::ThousandCrossed,
        MilestoneEvent::FiveThousandCrossed,
        MilestoneEvent::EndsIn69,
        MilestoneEvent::EndsIn666,
        MilestoneEvent::Palindromic,
    ];

    /// Emoji reaction requested for this milestone, if any.
    pub fn reaction(self) -> Option<&'static str> {
        match self {
            MilestoneEvent::ThousandCrossed => Some("tada"),
            MilestoneEvent::FiveThousandCrossed => None,
            MilestoneEvent::EndsIn69 => Some("ok_hand"),
            MilestoneEvent::EndsIn666 => Some("smiling_imp"),
            MilestoneEvent::Palindromic => Some("tacocat"),
        }
    }

    /// Whether this milestone asks for the message to be pinned.
    pub fn pins(self) -> bool {
        matches!(self, MilestoneEvent::FiveThousandCrossed)
    }
}

impl std::fmt::Display for MilestoneEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MilestoneEvent::ThousandCrossed => write!(f, "thousand"),
            MilestoneEvent::FiveThousandCrossed => write!(f, "five-thousand"),
            MilestoneEvent::EndsIn69 => write!(f, "ends-in-69"),
            MilestoneEvent::EndsIn666 => write!(f, "ends-in-666"),
            MilestoneEvent::Palindromic => write!(f, "palindromic"),
        }
    }
}

/// The set of milestones a single value matched.
pub type MilestoneSet = BTreeSet<MilestoneEvent>;
