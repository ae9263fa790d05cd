//! String utilities for the domain layer.

/// Collapse a message into a single-line preview of at most `max_chars`
/// characters, for log lines and settings summaries.
///
/// Whitespace runs (including newlines) become single spaces. Truncation
/// counts characters, not bytes, so multi-byte text never splits.
pub fn preview(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = collapsed.chars().take(keep).collect();
    out.push_str("...");
    out
}
