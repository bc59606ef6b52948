//! Column mapping: byte offsets to on-screen columns and back.
//!
//! A raw byte offset is not a rendering column once tabs or multi-byte
//! characters appear on a line. The [`ColumnMapper`] walks a line from its
//! start and accumulates a **virtual column**:
//!
//! - a tab advances to the next multiple of the tab width
//! - every other character, ASCII or multi-byte UTF-8, advances by one
//!
//! ```text
//! bytes:   \t  a  é(2 bytes)  b
//! column:  0   4  5           6   → 7
//! ```
//!
//! The content is not assumed to be valid UTF-8. A lead byte only claims the
//! continuation bytes (`0b10xx_xxxx`) that actually follow it, up to the
//! length it announces and never past the end of the range being walked.
//! A Latin-1 `é` (`0xE9`) followed by a newline is therefore one byte wide,
//! and a stray byte counts as a one-column character.

use crate::options::DEFAULT_TAB_WIDTH;

// ---------------------------------------------------------------------------
// UTF-8 character stepping
// ---------------------------------------------------------------------------

/// Byte length of the UTF-8 character introduced by `lead`.
///
/// Continuation bytes and invalid leads count as single-byte characters.
#[inline]
#[must_use]
pub const fn char_len(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

#[inline]
const fn is_continuation(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

/// Byte length of the character starting at `index`, stopping at `end`.
///
/// Counts the lead byte plus the continuation bytes that really follow it,
/// at most [`char_len`] in total. Returns 0 when `index >= end`.
#[must_use]
pub fn char_len_at(content: &[u8], index: usize, end: usize) -> usize {
    let end = end.min(content.len());
    if index >= end {
        return 0;
    }

    let claimed = char_len(content[index]);
    let mut len = 1;
    while len < claimed && index + len < end && is_continuation(content[index + len]) {
        len += 1;
    }
    len
}

/// Offset just past the character starting at `index`, never beyond
/// `content.len()`.
#[must_use]
pub fn next_char_boundary(content: &[u8], index: usize) -> usize {
    if index >= content.len() {
        return content.len();
    }
    index + char_len_at(content, index, content.len())
}

/// Start of the character ending just before `index`.
///
/// Walks back over at most three continuation bytes. Returns 0 at the start
/// of the buffer.
#[must_use]
pub fn prev_char_boundary(content: &[u8], index: usize) -> usize {
    let index = index.min(content.len());
    if index == 0 {
        return 0;
    }

    let mut start = index - 1;
    while start > 0 && index - start < 4 && is_continuation(content[start]) {
        start -= 1;
    }

    // Only accept the walk-back if the lead byte actually spans to `index`;
    // otherwise the byte before `index` stands alone.
    if start + char_len_at(content, start, index) >= index {
        start
    } else {
        index - 1
    }
}

// ---------------------------------------------------------------------------
// ColumnMapper
// ---------------------------------------------------------------------------

/// Converts between byte offsets and virtual columns for a fixed tab width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapper {
    tab_width: usize,
}

impl Default for ColumnMapper {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_WIDTH)
    }
}

impl ColumnMapper {
    /// Create a mapper with the given tab width (minimum 1).
    #[must_use]
    pub fn new(tab_width: usize) -> Self {
        Self {
            tab_width: tab_width.max(1),
        }
    }

    /// Tab stop width in columns.
    #[inline]
    #[must_use]
    pub const fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Column after placing `byte` (a character's lead byte) at `col`.
    #[inline]
    #[must_use]
    pub const fn advance(&self, col: usize, byte: u8) -> usize {
        if byte == b'\t' {
            col + (self.tab_width - col % self.tab_width)
        } else {
            col + 1
        }
    }

    /// Virtual column of `point`, measured from `line_start`.
    ///
    /// `point` is clamped to the content length; a `point` before
    /// `line_start` yields column 0.
    #[must_use]
    pub fn virtual_column(&self, content: &[u8], line_start: usize, point: usize) -> usize {
        let end = point.min(content.len());
        let mut col = 0;
        let mut i = line_start;
        while i < end {
            col = self.advance(col, content[i]);
            i += char_len_at(content, i, end);
        }
        col
    }

    /// Total virtual width of the line `start..end`.
    #[inline]
    #[must_use]
    pub fn line_width(&self, content: &[u8], start: usize, end: usize) -> usize {
        self.virtual_column(content, start, end)
    }

    /// Last character boundary in `start..=end` whose column is `<= col`.
    ///
    /// Used to land on a goal column: a character that would straddle the
    /// goal (a tab, typically) is not entered.
    #[must_use]
    pub fn offset_at_or_before(&self, content: &[u8], start: usize, end: usize, col: usize) -> usize {
        let end = end.min(content.len());
        let mut current = 0;
        let mut i = start;
        while i < end {
            let next_col = self.advance(current, content[i]);
            if next_col > col {
                break;
            }
            current = next_col;
            i += char_len_at(content, i, end);
        }
        i
    }

    /// First character boundary in `start..=end` whose column is `>= col`,
    /// or `end` if the line is narrower than `col`.
    #[must_use]
    pub fn offset_at_or_after(&self, content: &[u8], start: usize, end: usize, col: usize) -> usize {
        let end = end.min(content.len());
        let mut current = 0;
        let mut i = start;
        while i < end && current < col {
            current = self.advance(current, content[i]);
            i += char_len_at(content, i, end);
        }
        i
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
