//! Cursor: point assignment and movement commands.
//!
//! The cursor is a byte offset (the **point**) plus a **goal column**: the
//! virtual column vertical motion tries to return to. Moving through a short
//! line and back onto a long one restores the original column. Horizontal
//! motion, edits, and searches reset the goal to wherever the point lands.
//!
//! Every movement reconciles by scrolling: the point goes where the command
//! says, and the viewport follows.
//!
//! # Saved point
//!
//! [`Buffer::store_point_location`] stashes the point in a single slot so a
//! cancelable prompt (search, goto line) can put it back. It is not a stack:
//! storing again overwrites the previous value.

use crate::buffer::Buffer;
use crate::column::{next_char_boundary, prev_char_boundary};
use crate::motion;
use crate::viewport::Reconcile;

/// Point, goal column, and the saved-point slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub(crate) point: usize,
    pub(crate) goal_col: usize,
    pub(crate) saved_point: usize,
}

impl Buffer {
    // -- Assignment ---------------------------------------------------------

    /// Move the point to `value`, clamped to `[0, content.len()]`.
    ///
    /// After reconciling, `set_goal` records the new virtual column as the
    /// goal for later vertical motion.
    pub fn set_point(&mut self, value: usize, reconcile: Reconcile, set_goal: bool) {
        self.cursor.point = value.min(self.content.len());
        self.reconcile(reconcile);
        if set_goal {
            self.cursor.goal_col = self.current_virtual_col();
        }
    }

    /// Move to `line` (clamped to the last line), at the goal column or the
    /// end of the line if it is shorter. Leaves the goal column untouched.
    pub fn set_line(&mut self, line: usize, reconcile: Reconcile) {
        let line = line.min(self.lines.last_line());
        let start = self.line_start(line);
        let end = self.line_end(line);
        let target = self
            .columns
            .offset_at_or_before(&self.content, start, end, self.cursor.goal_col);
        self.set_point(target, reconcile, false);
    }

    /// Remember the current point for a later restore.
    pub const fn store_point_location(&mut self) {
        self.cursor.saved_point = self.cursor.point;
    }

    /// Return to the remembered point. Scrolls to it and resets the goal.
    pub fn restore_point_location(&mut self) {
        self.set_point(self.cursor.saved_point, Reconcile::ScrollToPoint, true);
    }

    // -- Buffer and line ends -----------------------------------------------

    pub fn begin_of_buffer(&mut self) {
        self.set_point(0, Reconcile::ScrollToPoint, true);
    }

    pub fn end_of_buffer(&mut self) {
        self.set_point(self.content.len(), Reconcile::ScrollToPoint, true);
    }

    pub fn begin_of_line(&mut self) {
        let start = self.line_start(self.current_line());
        self.set_point(start, Reconcile::ScrollToPoint, true);
    }

    pub fn end_of_line(&mut self) {
        let end = self.line_end(self.current_line());
        self.set_point(end, Reconcile::ScrollToPoint, true);
    }

    /// First byte of the current line that is neither space nor tab.
    pub fn back_to_indentation(&mut self) {
        let line = self.current_line();
        let end = self.line_end(line);
        let mut i = self.line_start(line);
        while i < end && matches!(self.content[i], b' ' | b'\t') {
            i += 1;
        }
        self.set_point(i, Reconcile::ScrollToPoint, true);
    }

    // -- Characters ---------------------------------------------------------

    /// One whole character forward.
    pub fn forward_character(&mut self) {
        let next = next_char_boundary(&self.content, self.cursor.point);
        self.set_point(next, Reconcile::ScrollToPoint, true);
    }

    /// One whole character backward.
    pub fn backward_character(&mut self) {
        let prev = prev_char_boundary(&self.content, self.cursor.point);
        self.set_point(prev, Reconcile::ScrollToPoint, true);
    }

    // -- Words and paragraphs -----------------------------------------------

    /// Just past the end of the current or next word, else end of buffer.
    pub fn forward_word(&mut self) {
        match motion::word_boundary_forward(&self.content, self.cursor.point) {
            Some(i) => self.set_point(i, Reconcile::ScrollToPoint, true),
            None => self.end_of_buffer(),
        }
    }

    /// Start of the previous word, else start of buffer.
    pub fn backward_word(&mut self) {
        let found = self
            .cursor
            .point
            .checked_sub(1)
            .and_then(|i| motion::word_boundary_backward(&self.content, i));
        match found {
            Some(i) => self.set_point(i, Reconcile::ScrollToPoint, true),
            None => self.begin_of_buffer(),
        }
    }

    /// Next blank line, else end of buffer.
    pub fn forward_paragraph(&mut self) {
        match motion::paragraph_boundary_forward(&self.content, self.cursor.point) {
            Some(i) => self.set_point(i, Reconcile::ScrollToPoint, true),
            None => self.end_of_buffer(),
        }
    }

    /// Previous blank line, else start of buffer.
    pub fn backward_paragraph(&mut self) {
        let found = self
            .cursor
            .point
            .checked_sub(1)
            .and_then(|i| motion::paragraph_boundary_backward(&self.content, i));
        match found {
            Some(i) => self.set_point(i, Reconcile::ScrollToPoint, true),
            None => self.begin_of_buffer(),
        }
    }

    // -- Lines --------------------------------------------------------------

    /// Down one line, keeping the goal column. No-op on the last line.
    pub fn forward_line(&mut self) {
        let line = self.current_line();
        if line < self.lines.last_line() {
            self.set_line(line + 1, Reconcile::ScrollToPoint);
        }
    }

    /// Up one line, keeping the goal column. No-op on the first line.
    pub fn backward_line(&mut self) {
        if let Some(line) = self.current_line().checked_sub(1) {
            self.set_line(line, Reconcile::ScrollToPoint);
        }
    }

    /// Jump to `line` (0-based, clamped) and center it on screen.
    pub fn goto_line(&mut self, line: usize) {
        let line = line.min(self.lines.last_line());
        self.set_line(line, Reconcile::ScrollToPoint);
        self.scroll_current_line_middle();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn buf(text: &str) -> Buffer {
        let mut b = Buffer::from_text(text);
        b.set_screen_size(80, 24);
        b
    }

    fn buf_at(text: &str, point: usize) -> Buffer {
        let mut b = buf(text);
        b.set_point(point, Reconcile::ScrollToPoint, true);
        b
    }

    // -- set_point / set_line -----------------------------------------------

    #[test]
    fn set_point_clamps_to_content_length() {
        let mut b = buf("hello");
        b.set_point(1000, Reconcile::ScrollToPoint, true);
        assert_eq!(b.point(), 5);
        b.set_point(0, Reconcile::ScrollToPoint, true);
        assert_eq!(b.point(), 0);
    }

    #[test]
    fn set_point_records_goal_only_when_asked() {
        let mut b = buf("abcdef");
        b.set_point(3, Reconcile::ScrollToPoint, true);
        assert_eq!(b.goal_col(), 3);
        b.set_point(1, Reconcile::ScrollToPoint, false);
        assert_eq!(b.goal_col(), 3);
    }

    #[test]
    fn set_line_uses_goal_column() {
        let mut b = buf_at("abcd\nxy\nabcdef", 3);
        b.set_line(2, Reconcile::ScrollToPoint);
        assert_eq!(b.point(), 8 + 3);
        assert_eq!(b.goal_col(), 3);
    }

    #[test]
    fn set_line_clamps_line_and_column() {
        let mut b = buf_at("abcd\nxy", 4);
        b.set_line(99, Reconcile::ScrollToPoint);
        assert_eq!(b.current_line(), 1);
        assert_eq!(b.point(), 7); // end of "xy"
    }

    #[test]
    fn set_line_goal_is_virtual() {
        // Goal column 4 lands after the tab, not at byte 4.
        let text = "abcd\n\txyz";
        let mut b = buf_at(text, 4);
        b.set_line(1, Reconcile::ScrollToPoint);
        assert_eq!(b.point(), 6);
        assert_eq!(b.current_virtual_col(), 4);
    }

    // -- Saved point --------------------------------------------------------

    #[test]
    fn store_and_restore_point() {
        let mut b = buf_at("one two three", 4);
        b.store_point_location();
        b.end_of_buffer();
        b.restore_point_location();
        assert_eq!(b.point(), 4);
        assert_eq!(b.goal_col(), 4);
    }

    #[test]
    fn store_overwrites_single_slot() {
        let mut b = buf_at("abcdef", 1);
        b.store_point_location();
        b.set_point(3, Reconcile::ScrollToPoint, true);
        b.store_point_location();
        b.begin_of_buffer();
        b.restore_point_location();
        assert_eq!(b.point(), 3);
    }

    // -- Buffer and line ends -----------------------------------------------

    #[test]
    fn begin_and_end_of_buffer() {
        let mut b = buf_at("ab\ncd", 2);
        b.end_of_buffer();
        assert_eq!(b.point(), 5);
        b.begin_of_buffer();
        assert_eq!(b.point(), 0);
    }

    #[test]
    fn begin_and_end_of_line() {
        let mut b = buf_at("ab\ncdef\ngh", 5);
        b.end_of_line();
        assert_eq!(b.point(), 7);
        b.begin_of_line();
        assert_eq!(b.point(), 3);
    }

    #[test]
    fn back_to_indentation_skips_spaces_and_tabs() {
        let mut b = buf_at("x\n \t  foo", 8);
        b.back_to_indentation();
        assert_eq!(b.point(), 6);
    }

    #[test]
    fn back_to_indentation_on_blank_line_goes_to_end() {
        let mut b = buf_at("   \nx", 0);
        b.back_to_indentation();
        assert_eq!(b.point(), 3);
    }

    // -- Characters ---------------------------------------------------------

    #[test]
    fn forward_and_backward_character() {
        let mut b = buf("ab");
        b.forward_character();
        assert_eq!(b.point(), 1);
        b.forward_character();
        b.forward_character();
        assert_eq!(b.point(), 2);
        b.backward_character();
        assert_eq!(b.point(), 1);
        b.backward_character();
        b.backward_character();
        assert_eq!(b.point(), 0);
    }

    #[test]
    fn character_motion_steps_whole_utf8_chars() {
        let mut b = buf("aé你b");
        b.forward_character();
        b.forward_character();
        assert_eq!(b.point(), 3);
        b.forward_character();
        assert_eq!(b.point(), 6);
        b.backward_character();
        assert_eq!(b.point(), 3);
        b.backward_character();
        assert_eq!(b.point(), 1);
    }

    #[test]
    fn latin1_byte_is_one_character() {
        let mut b = Buffer::from_bytes("x", b"caf\xe9\nbar".to_vec(), Options::default());
        b.set_screen_size(80, 24);
        b.set_point(3, Reconcile::ScrollToPoint, true);
        b.forward_character();
        assert_eq!(b.point(), 4);
        assert_eq!(b.current_line(), 0);
        assert_eq!(b.current_virtual_col(), 4);
        b.backward_character();
        assert_eq!(b.point(), 3);
    }

    #[test]
    fn character_motion_crosses_newlines() {
        let mut b = buf_at("ab\ncd", 2);
        b.forward_character();
        assert_eq!(b.current_line(), 1);
        assert_eq!(b.current_col(), 0);
    }

    // -- Words and paragraphs -----------------------------------------------

    #[test]
    fn forward_word_stops_after_words() {
        let mut b = buf("foo bar");
        b.forward_word();
        assert_eq!(b.point(), 3);
        b.forward_word();
        assert_eq!(b.point(), 7);
    }

    #[test]
    fn backward_word_stops_at_word_starts() {
        let mut b = buf_at("foo bar", 7);
        b.backward_word();
        assert_eq!(b.point(), 4);
        b.backward_word();
        assert_eq!(b.point(), 0);
        b.backward_word();
        assert_eq!(b.point(), 0);
    }

    #[test]
    fn paragraph_motion_lands_on_blank_lines() {
        let text = "one\ntwo\n\nthree\n\nfour";
        let mut b = buf(text);
        b.forward_paragraph();
        assert_eq!(b.point(), 8);
        b.forward_paragraph();
        assert_eq!(b.point(), 15);
        b.forward_paragraph();
        assert_eq!(b.point(), text.len());

        b.backward_paragraph();
        assert_eq!(b.point(), 15);
        b.backward_paragraph();
        assert_eq!(b.point(), 8);
        b.backward_paragraph();
        assert_eq!(b.point(), 0);
    }

    // -- Lines --------------------------------------------------------------

    #[test]
    fn goal_column_survives_short_line() {
        let mut b = buf_at("abcd\nx\nabcdef", 3);
        b.forward_line();
        assert_eq!((b.current_line(), b.current_col()), (1, 1));
        b.forward_line();
        assert_eq!((b.current_line(), b.current_col()), (2, 3));
    }

    #[test]
    fn goal_column_walk_up_and_down() {
        let mut b = buf_at("ab\nc\nabcdef", 2);
        b.forward_line();
        assert_eq!(b.point(), 4);
        b.forward_line();
        assert_eq!(b.point(), 7);
        b.backward_line();
        assert_eq!((b.current_line(), b.current_col()), (1, 1));
        b.backward_line();
        assert_eq!((b.current_line(), b.current_col()), (0, 2));
    }

    #[test]
    fn vertical_motion_at_edges_is_noop() {
        let mut b = buf_at("ab\ncd", 1);
        b.backward_line();
        assert_eq!(b.point(), 1);
        b.forward_line();
        b.forward_line();
        assert_eq!(b.point(), 4);
    }

    #[test]
    fn vertical_motion_through_tabs_keeps_virtual_goal() {
        let options = Options::new().with_tab_width(4);
        let mut b = Buffer::from_bytes("t", b"\tab\nabcdefg\n\tab".to_vec(), options);
        b.set_screen_size(80, 24);
        b.set_point(2, Reconcile::ScrollToPoint, true); // after 'a', column 5
        b.forward_line();
        assert_eq!(b.current_col(), 5);
        b.forward_line();
        assert_eq!(b.current_virtual_col(), 5);
        assert_eq!(b.current_col(), 2);
    }

    #[test]
    fn goto_line_clamps_and_centers() {
        let text: String = (0..100).map(|i| format!("line {i}\n")).collect();
        let mut b = buf(&text);
        b.goto_line(50);
        assert_eq!(b.current_line(), 50);
        assert_eq!(b.offset_line(), 50 - 11);

        b.goto_line(10_000);
        assert_eq!(b.current_line(), 100);
    }
}
