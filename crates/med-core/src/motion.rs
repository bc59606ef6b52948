//! Motion boundaries: word and paragraph scans over raw bytes.
//!
//! | Function | Finds |
//! |----------|-------|
//! | [`word_boundary_forward`] | the offset just past the end of a word |
//! | [`word_boundary_backward`] | the first byte of a word |
//! | [`paragraph_boundary_forward`] | the second newline of a `\n\n` pair |
//! | [`paragraph_boundary_backward`] | the second newline of a `\n\n` pair |
//!
//! A **word byte** is an ASCII letter or digit. Everything else, including
//! underscores and every byte of a multi-byte character, separates words.
//!
//! Both paragraph directions land on the start of the blank line between
//! two paragraphs. All scans return `None` when they run off the buffer; the
//! caller decides where to go instead.

/// Whether `byte` is part of a word.
#[inline]
#[must_use]
pub const fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
}

/// First `j >= from` where a word ends at `j + 1`. Returns `j + 1`.
#[must_use]
pub fn word_boundary_forward(content: &[u8], from: usize) -> Option<usize> {
    content
        .windows(2)
        .enumerate()
        .skip(from)
        .find(|(_, pair)| is_word_byte(pair[0]) && !is_word_byte(pair[1]))
        .map(|(j, _)| j + 1)
}

/// Largest `j <= from`, `j > 0`, where a word starts at `j`.
#[must_use]
pub fn word_boundary_backward(content: &[u8], from: usize) -> Option<usize> {
    let from = from.min(content.len().checked_sub(1)?);
    (1..=from)
        .rev()
        .find(|&j| is_word_byte(content[j]) && !is_word_byte(content[j - 1]))
}

/// First `\n\n` pair at `(j, j + 1)` with `j >= from`. Returns `j + 1`.
#[must_use]
pub fn paragraph_boundary_forward(content: &[u8], from: usize) -> Option<usize> {
    content
        .windows(2)
        .enumerate()
        .skip(from)
        .find(|(_, pair)| pair[0] == b'\n' && pair[1] == b'\n')
        .map(|(j, _)| j + 1)
}

/// Last `\n\n` pair at `(j - 1, j)` with `0 < j <= from`. Returns `j`.
#[must_use]
pub fn paragraph_boundary_backward(content: &[u8], from: usize) -> Option<usize> {
    let from = from.min(content.len().checked_sub(1)?);
    (1..=from)
        .rev()
        .find(|&j| content[j] == b'\n' && content[j - 1] == b'\n')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
