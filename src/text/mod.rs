//! # Text Wrapping
//!
//! Greedy word wrap against real font metrics. Words are whitespace-separated
//! and never split: a word wider than the line stands alone on its own line.
//! No hyphenation, no justification.

use crate::font::{FontContext, FontFace};

/// Wrap `text` into lines no wider than `max_width` points in the given face
/// and size. Runs of whitespace collapse to a single space; empty or
/// whitespace-only input yields no lines.
pub fn wrap_text(
    fonts: &FontContext,
    text: &str,
    face: FontFace,
    font_size: f64,
    max_width: f64,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if fonts.measure(&candidate, face, font_size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
