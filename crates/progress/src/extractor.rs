//! Leading-number extraction from free-form tally posts.
//!
//! Counting posts look like `"12345"`, `"12345 nice"` or `"12345-ish\nlol"`.
//! Only the leading token is considered; this is a heuristic, not a
//! tokenizer.

/// Delimiters that end the leading token, in priority order.
const DELIMITERS: [char; 3] = ['\n', ' ', '-'];

/// Return the candidate tally token of `text`.
///
/// The first delimiter kind present in the text (newline, then space, then
/// hyphen) wins, and the text before its first occurrence is returned. With
/// no delimiter the whole text is the candidate. The result is not
/// validated; use [`parse_tally`] for that.
pub fn extract(text: &str) -> &str {
    for delimiter in DELIMITERS {
        if let Some(idx) = text.find(delimiter) {
            return &text[..idx];
        }
    }
    text
}

/// Extract and validate the tally value of `text`.
///
/// Returns `None` unless the candidate is a non-empty run of ASCII digits
/// that fits in an `i64`. Failed conversions are absent, never zero.
pub fn parse_tally(text: &str) -> Option<i64> {
    let candidate = extract(text);
    if candidate.is_empty() || !candidate.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    candidate.parse().ok()
}

/// Cheap gate for real-time events: does the text start with a digit?
pub fn looks_like_tally(text: &str) -> bool {
    text.chars().next().is_some_and(|c| c.is_ascii_digit())
}
