//! Reduce raw provider output to a single commit message.
//!
//! CLI tools wrap the answer in chrome: a trailing usage banner, a leading
//! bullet glyph, and sometimes commentary before the message. The steps
//! below strip that chrome deterministically and locate the first line
//! that starts with a known commit prefix.

use crate::config::Config;

/// Usage banner markers, tried in order.
const USAGE_MARKERS: [&str; 2] = ["\n\nTotal usage", "\nTotal usage"];

/// Bullet glyph some tools put in front of their answer.
const BULLET: char = '●';

/// Normalize raw output. Returns `None` when nothing is left after cleanup.
///
/// Output without any recognized prefix line is returned cleaned but
/// otherwise unchanged.
pub fn normalize(config: &Config, raw: &str) -> Option<String> {
    normalize_with_markers(&config.prefix_markers(), raw)
}

/// Same as [`normalize`] with an explicit marker list (`feat:`, `fix:`, ...).
pub fn normalize_with_markers(markers: &[String], raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let without_banner = strip_usage_banner(trimmed);
    let cleaned = strip_bullet(without_banner).trim();
    if cleaned.is_empty() {
        return None;
    }

    match find_message_start(markers, cleaned) {
        Some(start) => Some(cleaned[start..].trim().to_string()),
        None => Some(cleaned.to_string()),
    }
}

/// Truncate at the usage banner, blank-line form first, then the bare form.
fn strip_usage_banner(text: &str) -> &str {
    USAGE_MARKERS.iter().fold(text, |acc, marker| match acc.find(marker) {
        Some(idx) => &acc[..idx],
        None => acc,
    })
}

/// Strip a single leading bullet glyph and the space after it.
fn strip_bullet(text: &str) -> &str {
    match text.strip_prefix(BULLET) {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => text,
    }
}

/// Byte offset of the first line whose trimmed text starts with any marker.
fn find_message_start(markers: &[String], text: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if markers.iter().any(|m| trimmed.starts_with(m.as_str())) {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}
