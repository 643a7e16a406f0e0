//! Text helpers for ticket content and log lines.

const ELLIPSIS: &str = "...";

/// Shorten `s` to at most `max_len` bytes, marking the cut with `...`.
///
/// The cut never splits a multi-byte character.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let budget = max_len.saturating_sub(ELLIPSIS.len());
    let end = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= budget)
        .last()
        .unwrap_or(0);
    format!("{}{}", &s[..end], ELLIPSIS)
}

/// Join a ticket's subject and body into the text every stage analyses.
pub fn ticket_text(subject: &str, body: &str) -> String {
    format!("{}\n\n{}", subject, body)
}
