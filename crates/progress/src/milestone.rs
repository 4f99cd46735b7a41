//! Milestone classification.

use tally_core::{MilestoneEvent, MilestoneSet};

/// Classify a tally value against every milestone predicate.
///
/// Predicates are independent; one value can match several. This has no
/// side effects: mapping matches to reactions and pins is the caller's job.
pub fn classify(value: i64) -> MilestoneSet {
    let digits = value.to_string();
    let mut matched = MilestoneSet::new();

    if value % 1000 == 0 {
        matched.insert(MilestoneEvent::ThousandCrossed);
    }
    if value % 5000 == 0 {
        matched.insert(MilestoneEvent::FiveThousandCrossed);
    }
    if digits.ends_with("69") {
        matched.insert(MilestoneEvent::EndsIn69);
    }
    if digits.ends_with("666") {
        matched.insert(MilestoneEvent::EndsIn666);
    }
    if is_palindromic(&digits) {
        matched.insert(MilestoneEvent::Palindromic);
    }

    matched
}

/// Last three characters equal the first three reversed.
///
/// Shorter strings compare whatever is there: every 1-digit value matches,
/// 2-digit values match when both digits agree.
fn is_palindromic(digits: &str) -> bool {
    let bytes = digits.as_bytes();
    let n = bytes.len().min(3);
    let head = &bytes[..n];
    let tail = &bytes[bytes.len() - n..];
    head.iter().rev().eq(tail.iter())
}
