//! Outbound text filter for the rendering surface.
//!
//! `$` and `*` carry meaning for the markdown surface that displays model
//! output, so every adapter escapes them before text leaves the adapter.
//! [`unescape`] reverses the filter at display time.

/// Escape `$` and `*` with a leading backslash.
pub fn escape(text: &str) -> String {
    text.replace('$', "\\$").replace('*', "\\*")
}

/// Undo [`escape`].
///
/// Only the two escape sequences produced by [`escape`] are rewritten; any
/// other backslash is left alone.
pub fn unescape(text: &str) -> String {
    text.replace("\\$", "$").replace("\\*", "*")
}
