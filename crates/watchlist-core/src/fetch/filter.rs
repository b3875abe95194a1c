//! Drop blank and comment lines from fetched content.

use std::borrow::Cow;

/// Keep every line that is not whitespace-only and does not start with
/// `comment`, in order and with its original terminator. Lines that are not
/// valid UTF-8 are read as Latin-1. An empty `comment` keeps comment-like lines.
pub fn filter_lines(raw: &[u8], comment: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for line in raw.split_inclusive(|b| *b == b'\n') {
        let text = decode_line(line);
        if text.chars().all(|c| c.is_ascii_whitespace()) {
            continue;
        }
        if !comment.is_empty() && text.starts_with(comment) {
            continue;
        }
        out.push_str(&text);
    }
    out
}

fn decode_line(line: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(line) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => Cow::Owned(line.iter().map(|&b| char::from(b)).collect()),
    }
}
