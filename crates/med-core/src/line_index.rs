//! Line index: byte offsets of every line start.
//!
//! Derived data: the index is rebuilt in full from the content after every
//! mutation. There is one entry per line, so a buffer with `n` newlines has
//! `n + 1` lines, and an empty buffer has exactly one (empty) line.
//!
//! Line `i` spans `start(i)..end(i)`. The end is exclusive and excludes the
//! newline: it is the byte before the next line's start, or the content
//! length for the last line. There is no implied trailing newline.

/// Ordered line-start offsets, `starts[0] == 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl LineIndex {
    /// Index of an empty buffer: one line starting at 0.
    #[must_use]
    pub fn new() -> Self {
        Self { starts: vec![0] }
    }

    /// Build an index for `content`.
    #[must_use]
    pub fn from_content(content: &[u8]) -> Self {
        let mut index = Self::new();
        index.rebuild(content);
        index
    }

    /// Replace the index with the line starts of `content`. One O(n) scan.
    pub fn rebuild(&mut self, content: &[u8]) {
        self.starts.clear();
        self.starts.push(0);
        self.starts.extend(
            content
                .iter()
                .enumerate()
                .filter(|&(_, &b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );

        debug_assert_eq!(
            self.starts.len(),
            content.iter().filter(|&&b| b == b'\n').count() + 1
        );
    }

    /// Number of lines. Never zero.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Always `false`; an index has at least one line. Provided for API
    /// symmetry with [`len`](Self::len).
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Index of the last line.
    #[inline]
    #[must_use]
    pub fn last_line(&self) -> usize {
        self.starts.len() - 1
    }

    /// First byte of `line`. Out-of-range lines clamp to the last line.
    #[inline]
    #[must_use]
    pub fn start(&self, line: usize) -> usize {
        self.starts[line.min(self.last_line())]
    }

    /// Exclusive end of `line`, not counting its newline.
    ///
    /// `content_len` is needed for the last line, which runs to the end of
    /// the buffer. Out-of-range lines clamp to the last line.
    #[must_use]
    pub fn end(&self, line: usize, content_len: usize) -> usize {
        let line = line.min(self.last_line());
        if line == self.last_line() {
            content_len
        } else {
            self.starts[line + 1] - 1
        }
    }

    /// The line containing byte `offset`.
    ///
    /// A newline byte belongs to the line it terminates, and `content.len()`
    /// belongs to the last line.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        // starts[0] == 0 <= offset, so the partition point is at least 1.
        self.starts.partition_point(|&start| start <= offset) - 1
    }
}
