//! Search: plain substring search anchored at the point.
//!
//! Patterns are literal bytes; there is no regex and no wrap-around. A
//! forward search looks strictly after the point and a backward search
//! strictly before it, so repeating a search steps from match to match.
//! On a hit the point moves to the first byte of the match, the viewport
//! scrolls to it, and the goal column resets. On a miss nothing changes.

use crate::buffer::Buffer;
use crate::viewport::Reconcile;

/// Search direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl SearchDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// First occurrence of `needle` starting at or after `from`.
#[must_use]
pub fn find_forward(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| from + i)
}

/// Last occurrence of `needle` starting at or before `until`.
#[must_use]
pub fn find_backward(haystack: &[u8], needle: &[u8], until: usize) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    let last_start = until.min(haystack.len() - needle.len());
    (0..=last_start)
        .rev()
        .find(|&i| haystack[i..].starts_with(needle))
}

impl Buffer {
    /// Jump to the next occurrence of `text` after the point.
    ///
    /// Returns `false`, leaving the point alone, at end of buffer, for an
    /// empty pattern, or when there is no match.
    pub fn search_forward(&mut self, text: &str) -> bool {
        let point = self.cursor.point;
        if point == self.content.len() || text.is_empty() {
            return false;
        }
        match find_forward(&self.content, text.as_bytes(), point + 1) {
            Some(pos) => {
                self.set_point(pos, Reconcile::ScrollToPoint, true);
                true
            }
            None => false,
        }
    }

    /// Jump to the previous occurrence of `text` before the point.
    ///
    /// Returns `false`, leaving the point alone, at start of buffer, for an
    /// empty pattern, or when there is no match.
    pub fn search_backward(&mut self, text: &str) -> bool {
        let point = self.cursor.point;
        if point == 0 || text.is_empty() {
            return false;
        }
        match find_backward(&self.content, text.as_bytes(), point - 1) {
            Some(pos) => {
                self.set_point(pos, Reconcile::ScrollToPoint, true);
                true
            }
            None => false,
        }
    }

    /// Search in `direction`.
    pub fn search(&mut self, text: &str, direction: SearchDirection) -> bool {
        match direction {
            SearchDirection::Forward => self.search_forward(text),
            SearchDirection::Backward => self.search_backward(text),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
