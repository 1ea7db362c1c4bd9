//! Character budgets. Budgets count `char`s, not bytes, so a cut never splits
//! a UTF-8 sequence.

/// First `max_chars` characters of `text` and whether anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

/// Truncate to `max_chars` and append `notice` when a cut happened.
pub fn clip_with_notice(text: &str, max_chars: usize, notice: &str) -> String {
    let (head, truncated) = truncate_chars(text, max_chars);
    if truncated {
        format!("{head}{notice}")
    } else {
        head.to_string()
    }
}

/// Excerpt for one-line display: whitespace collapsed, cut to `max_chars`
/// with a trailing ellipsis.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let (head, truncated) = truncate_chars(&collapsed, max_chars);
    if truncated {
        format!("{head}...")
    } else {
        collapsed
    }
}
