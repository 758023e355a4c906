//! Small shared helpers.

/// Truncate a string to `max_chars` characters, appending `...` when cut.
///
/// Strings at or under the limit are returned unchanged. Counts characters,
/// not bytes, so multi-byte log output is never split mid-codepoint.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}
