//! Editing: insertion and deletion at the point.
//!
//! Every mutation funnels through one private `splice`, which replaces a
//! byte range, marks the buffer changed, and rebuilds the line index before
//! anything can read it. Callers then place the point and reconcile by
//! scrolling.
//!
//! Deletions by character remove one whole UTF-8 character, never part of
//! one.

use std::ops::Range;

use crate::buffer::Buffer;
use crate::column::{next_char_boundary, prev_char_boundary};
use crate::motion;
use crate::viewport::Reconcile;

impl Buffer {
    fn splice(&mut self, range: Range<usize>, bytes: &[u8]) {
        self.content.splice(range, bytes.iter().copied());
        self.content_changed = true;
        self.lines.rebuild(&self.content);
    }

    // -- Insertion ----------------------------------------------------------

    /// Insert `c` at the point and move past it.
    pub fn insert_character(&mut self, c: char) {
        let mut utf8 = [0; 4];
        self.insert_bytes(c.encode_utf8(&mut utf8).as_bytes());
    }

    /// Insert `text` at the point in one splice and move past it.
    pub fn insert_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.insert_bytes(text.as_bytes());
        }
    }

    fn insert_bytes(&mut self, bytes: &[u8]) {
        let at = self.cursor.point;
        self.splice(at..at, bytes);
        self.set_point(at + bytes.len(), Reconcile::ScrollToPoint, true);
    }

    // -- Deletion -----------------------------------------------------------

    /// Delete the character under the point. No-op at end of buffer.
    pub fn delete_character_forward(&mut self) {
        let at = self.cursor.point;
        if at >= self.content.len() {
            return;
        }
        let end = next_char_boundary(&self.content, at);
        self.splice(at..end, &[]);
        self.reconcile(Reconcile::ScrollToPoint);
    }

    /// Delete the character before the point. No-op at start of buffer.
    pub fn delete_character_backward(&mut self) {
        let at = self.cursor.point;
        if at == 0 {
            return;
        }
        let start = prev_char_boundary(&self.content, at);
        self.splice(start..at, &[]);
        self.set_point(start, Reconcile::ScrollToPoint, true);
    }

    /// Delete up to the end of the current or next word, or to the end of
    /// the buffer if there is none.
    pub fn delete_word_forward(&mut self) {
        let at = self.cursor.point;
        if at >= self.content.len() {
            return;
        }
        let end = motion::word_boundary_forward(&self.content, at).unwrap_or(self.content.len());
        self.splice(at..end, &[]);
        self.reconcile(Reconcile::ScrollToPoint);
    }

    /// Delete back to the start of the previous word, or to the start of
    /// the buffer if there is none.
    pub fn delete_word_backward(&mut self) {
        let at = self.cursor.point;
        if at == 0 {
            return;
        }
        let start = motion::word_boundary_backward(&self.content, at - 1).unwrap_or(0);
        self.splice(start..at, &[]);
        self.set_point(start, Reconcile::ScrollToPoint, true);
    }

    /// Delete to the end of the line. At the end of a line, join the next
    /// one by deleting the newline.
    pub fn delete_rest_of_line(&mut self) {
        let at = self.cursor.point;
        let end = self.line_end(self.current_line());
        if at < end {
            self.splice(at..end, &[]);
            self.reconcile(Reconcile::ScrollToPoint);
        } else {
            self.delete_character_forward();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::buffer::Buffer;
    use crate::line_index::LineIndex;
    use crate::options::Options;
    use crate::viewport::Reconcile;
    use pretty_assertions::assert_eq;

    fn buf_at(text: &str, point: usize) -> Buffer {
        let mut b = Buffer::from_text(text);
        b.set_screen_size(80, 24);
        b.set_point(point, Reconcile::ScrollToPoint, true);
        b
    }

    fn text(b: &Buffer) -> &str {
        std::str::from_utf8(b.content()).unwrap()
    }

    /// The line index equals a fresh scan of the content.
    fn assert_index_fresh(b: &Buffer) {
        assert_eq!(b.lines, LineIndex::from_content(b.content()));
    }

    // -- Insertion ----------------------------------------------------------

    #[test]
    fn insert_ascii_advances_by_one() {
        let mut b = buf_at("ac", 1);
        b.insert_character('b');
        assert_eq!(text(&b), "abc");
        assert_eq!(b.point(), 2);
        assert!(b.content_changed());
    }

    #[test]
    fn insert_multibyte_advances_past_encoding() {
        let mut b = buf_at("ab", 1);
        b.insert_character('é');
        assert_eq!(text(&b), "aéb");
        assert_eq!(b.point(), 3);
        assert_eq!(b.current_virtual_col(), 2);
    }

    #[test]
    fn insert_newline_splits_line() {
        let mut b = buf_at("abcd", 2);
        b.insert_character('\n');
        assert_eq!(text(&b), "ab\ncd");
        assert_eq!(b.num_of_lines(), 2);
        assert_eq!((b.current_line(), b.current_col()), (1, 0));
        assert_index_fresh(&b);
    }

    #[test]
    fn insert_text_is_one_splice() {
        let mut b = buf_at("x", 1);
        b.insert_text("one\ntwo\n");
        assert_eq!(text(&b), "xone\ntwo\n");
        assert_eq!(b.point(), 9);
        assert_eq!(b.num_of_lines(), 3);
        assert_index_fresh(&b);
    }

    #[test]
    fn insert_empty_text_changes_nothing() {
        let mut b = buf_at("x", 0);
        b.insert_text("");
        assert!(!b.content_changed());
    }

    // -- Character deletion -------------------------------------------------

    #[test]
    fn delete_forward_removes_char_under_point() {
        let mut b = buf_at("abc", 1);
        b.delete_character_forward();
        assert_eq!(text(&b), "ac");
        assert_eq!(b.point(), 1);
    }

    #[test]
    fn delete_forward_at_end_is_noop() {
        let mut b = buf_at("abc", 3);
        b.delete_character_forward();
        assert_eq!(text(&b), "abc");
        assert!(!b.content_changed());
    }

    #[test]
    fn delete_backward_removes_char_before_point() {
        let mut b = buf_at("abc", 2);
        b.delete_character_backward();
        assert_eq!(text(&b), "ac");
        assert_eq!(b.point(), 1);
    }

    #[test]
    fn delete_backward_at_start_is_noop() {
        let mut b = buf_at("abc", 0);
        b.delete_character_backward();
        assert_eq!(text(&b), "abc");
        assert!(!b.content_changed());
    }

    #[test]
    fn character_deletion_removes_whole_utf8_chars() {
        let mut b = buf_at("a你é", 1);
        b.delete_character_forward();
        assert_eq!(text(&b), "aé");
        b.end_of_buffer();
        b.delete_character_backward();
        assert_eq!(text(&b), "a");
        assert_eq!(b.point(), 1);
    }

    #[test]
    fn deleting_latin1_byte_keeps_following_newline() {
        let mut b = Buffer::from_bytes("x", b"caf\xe9\nbar".to_vec(), Options::default());
        b.set_screen_size(80, 24);
        b.set_point(3, Reconcile::ScrollToPoint, true);
        b.delete_character_forward();
        assert_eq!(b.content(), b"caf\nbar");
        assert_eq!(b.point(), 3);
        assert_eq!(b.num_of_lines(), 2);

        let mut b = Buffer::from_bytes("x", b"caf\xe9\nbar".to_vec(), Options::default());
        b.set_screen_size(80, 24);
        b.set_point(4, Reconcile::ScrollToPoint, true);
        b.delete_character_backward();
        assert_eq!(b.content(), b"caf\nbar");
        assert_eq!(b.point(), 3);
        assert_index_fresh(&b);
    }

    #[test]
    fn backspace_over_newline_joins_lines() {
        let mut b = buf_at("ab\ncd", 3);
        b.delete_character_backward();
        assert_eq!(text(&b), "abcd");
        assert_eq!(b.num_of_lines(), 1);
        assert_index_fresh(&b);
    }

    // -- Word deletion ------------------------------------------------------

    #[test]
    fn delete_word_forward_to_boundary() {
        let mut b = buf_at("foo bar baz", 4);
        b.delete_word_forward();
        assert_eq!(text(&b), "foo  baz");
        assert_eq!(b.point(), 4);
    }

    #[test]
    fn delete_word_forward_without_boundary_deletes_to_end() {
        let mut b = buf_at("foo bar", 3);
        b.delete_word_forward();
        assert_eq!(text(&b), "foo");
    }

    #[test]
    fn delete_word_backward_to_boundary() {
        let mut b = buf_at("foo bar baz", 7);
        b.delete_word_backward();
        assert_eq!(text(&b), "foo  baz");
        assert_eq!(b.point(), 4);
    }

    #[test]
    fn delete_word_backward_from_inside_a_word() {
        let mut b = buf_at("  foo", 4);
        b.delete_word_backward();
        assert_eq!(text(&b), "  o");
        assert_eq!(b.point(), 2);

        let mut b = buf_at("foo bar", 2);
        b.delete_word_backward();
        assert_eq!(text(&b), "o bar");
        assert_eq!(b.point(), 0);
    }

    // -- Rest of line -------------------------------------------------------

    #[test]
    fn delete_rest_of_line_then_join() {
        let mut b = buf_at("ab\ncd", 1);
        b.delete_rest_of_line();
        assert_eq!(text(&b), "a\ncd");
        assert_eq!(b.point(), 1);
        b.delete_rest_of_line();
        assert_eq!(text(&b), "acd");
        assert_eq!(b.num_of_lines(), 1);
        assert_index_fresh(&b);
    }

    #[test]
    fn delete_rest_of_last_line_at_end_is_noop() {
        let mut b = buf_at("ab", 2);
        b.delete_rest_of_line();
        assert_eq!(text(&b), "ab");
    }

    // -- Invariants ---------------------------------------------------------

    #[test]
    fn index_stays_fresh_across_mixed_edits() {
        let mut b = buf_at("", 0);
        b.insert_text("alpha\nbeta\n\ngamma");
        b.goto_line(1);
        b.delete_rest_of_line();
        b.delete_rest_of_line();
        b.insert_character('\n');
        b.delete_word_backward();
        b.end_of_buffer();
        b.delete_word_backward();
        assert_index_fresh(&b);
        assert!(b.point() <= b.content().len());
    }
}
