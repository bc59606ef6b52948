//! Viewport: scroll offsets and point/viewport reconciliation.
//!
//! The viewport is the window of text the screen shows: a top-left corner
//! (`offset_line`, `offset_col`) plus the last terminal size the caller
//! reported. Two rows at the bottom belong to the status and message lines,
//! so the screen draws `screen_height - 2` text rows.
//!
//! After anything moves the point or the offsets, the two must be brought
//! back into agreement. There are two ways to do it:
//!
//! | Strategy | Moves | Used by |
//! |----------|-------|---------|
//! | [`Reconcile::ScrollToPoint`] | the offsets | movements, edits, searches, resizes |
//! | [`Reconcile::ClampPointToViewport`] | the point | scroll commands |
//!
//! ```text
//!            offset_col
//!                 │
//!   offset_line ──┼──────────────────────┐
//!                 │                      │ ← rows 0 ..= h-3
//!                 │        point         │
//!                 │                      │
//!                 └──────────────────────┘
//!                   cols 0 ..= w-1
//! ```
//!
//! When the screen is too small for a range to exist (`h < 3` or `w < 1`)
//! that axis is not reconciled.

use tracing::trace;

use crate::buffer::Buffer;

/// How to restore point visibility after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// Move the offsets so the point is on screen. Never moves the point.
    ScrollToPoint,
    /// Move the point to the nearest on-screen position. Never moves the
    /// offsets.
    ClampPointToViewport,
    /// Do nothing now; a reconciliation already in progress will finish.
    Deferred,
}

/// Scroll offsets and the last known screen size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub(crate) offset_line: usize,
    pub(crate) offset_col: usize,
    pub(crate) screen_width: usize,
    pub(crate) screen_height: usize,
}

impl Viewport {
    /// Offset of the last text row that counts as visible, or `None` if the
    /// screen is too short to have one.
    #[inline]
    #[must_use]
    pub const fn last_row(&self) -> Option<usize> {
        self.screen_height.checked_sub(3)
    }

    /// Offset of the last visible column, or `None` on a zero-width screen.
    #[inline]
    #[must_use]
    pub const fn last_col(&self) -> Option<usize> {
        self.screen_width.checked_sub(1)
    }

    /// Number of text rows the screen draws.
    #[inline]
    #[must_use]
    pub const fn text_rows(&self) -> usize {
        self.screen_height.saturating_sub(2)
    }
}

impl Buffer {
    // -- Screen size --------------------------------------------------------

    /// Record the terminal size. Scrolls to keep the point visible when the
    /// size actually changed.
    pub fn set_screen_size(&mut self, width: usize, height: usize) {
        if self.viewport.screen_width == width && self.viewport.screen_height == height {
            return;
        }
        trace!(width, height, "screen size changed");
        self.viewport.screen_width = width;
        self.viewport.screen_height = height;
        self.reconcile(Reconcile::ScrollToPoint);
    }

    // -- Offsets ------------------------------------------------------------

    /// Set the first visible line, clamped to `[0, num_of_lines - 2]`.
    pub fn set_offset_line(&mut self, value: usize, reconcile: Reconcile) {
        let max = self.num_of_lines().saturating_sub(2);
        self.viewport.offset_line = value.min(max);
        self.reconcile(reconcile);
    }

    /// Set the first visible column, clamped to two less than the current
    /// line's rendered width.
    pub fn set_offset_col(&mut self, value: usize, reconcile: Reconcile) {
        let line = self.current_line();
        let width = self
            .columns
            .line_width(&self.content, self.line_start(line), self.line_end(line));
        self.viewport.offset_col = value.min(width.saturating_sub(2));
        self.reconcile(reconcile);
    }

    // -- Reconciliation -----------------------------------------------------

    pub(crate) fn reconcile(&mut self, strategy: Reconcile) {
        match strategy {
            Reconcile::ScrollToPoint => self.reconcile_by_scrolling(),
            Reconcile::ClampPointToViewport => self.reconcile_by_moving_point(),
            Reconcile::Deferred => {}
        }
    }

    fn reconcile_by_scrolling(&mut self) {
        let line = self.current_line();
        let col = self.current_virtual_col();
        let last_row = self.viewport.last_row();
        let last_col = self.viewport.last_col();

        if line < self.viewport.offset_line {
            self.set_offset_line(line, Reconcile::Deferred);
        }
        if let Some(last) = last_row {
            if line > self.viewport.offset_line + last {
                self.set_offset_line(line - last, Reconcile::Deferred);
            }
        }

        if col < self.viewport.offset_col {
            self.set_offset_col(col, Reconcile::Deferred);
        }
        if let Some(last) = last_col {
            if col > self.viewport.offset_col + last {
                self.set_offset_col(col - last, Reconcile::Deferred);
            }
        }
    }

    fn reconcile_by_moving_point(&mut self) {
        let line = self.current_line();
        let offset_line = self.viewport.offset_line;

        if line < offset_line {
            self.set_line(offset_line, Reconcile::Deferred);
        } else if let Some(last) = self.viewport.last_row() {
            if line > offset_line + last {
                self.set_line(offset_line + last, Reconcile::Deferred);
            }
        }

        // Columns are measured on whatever line the point ended up on.
        let line = self.current_line();
        let start = self.line_start(line);
        let end = self.line_end(line);
        let col = self.current_virtual_col();
        let offset_col = self.viewport.offset_col;

        if col < offset_col {
            let target = self
                .columns
                .offset_at_or_after(&self.content, start, end, offset_col);
            self.set_point(target, Reconcile::Deferred, true);
        } else if let Some(last) = self.viewport.last_col() {
            if col > offset_col + last {
                let target = self
                    .columns
                    .offset_at_or_before(&self.content, start, end, offset_col + last);
                self.set_point(target, Reconcile::Deferred, true);
            }
        }
    }

    // -- Scrolling ----------------------------------------------------------

    /// Scroll the text down by one line (the view moves up).
    pub fn scroll_up(&mut self) {
        let value = self.viewport.offset_line.saturating_sub(1);
        self.set_offset_line(value, Reconcile::ClampPointToViewport);
    }

    /// Scroll the text up by one line (the view moves down).
    pub fn scroll_down(&mut self) {
        let value = self.viewport.offset_line + 1;
        self.set_offset_line(value, Reconcile::ClampPointToViewport);
    }

    pub fn scroll_left(&mut self) {
        let value = self.viewport.offset_col.saturating_sub(1);
        self.set_offset_col(value, Reconcile::ClampPointToViewport);
    }

    pub fn scroll_right(&mut self) {
        let value = self.viewport.offset_col + 1;
        self.set_offset_col(value, Reconcile::ClampPointToViewport);
    }

    /// Put the current line in the middle of the text rows.
    pub fn scroll_current_line_middle(&mut self) {
        let half = self.viewport.text_rows() / 2;
        let value = self.current_line().saturating_sub(half);
        self.set_offset_line(value, Reconcile::ClampPointToViewport);
    }

    pub fn scroll_page_up(&mut self) {
        let page = self.viewport.screen_height.saturating_sub(3);
        let value = self.viewport.offset_line.saturating_sub(page);
        self.set_offset_line(value, Reconcile::ClampPointToViewport);
    }

    pub fn scroll_page_down(&mut self) {
        let page = self.viewport.screen_height.saturating_sub(3);
        let value = self.viewport.offset_line + page;
        self.set_offset_line(value, Reconcile::ClampPointToViewport);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
