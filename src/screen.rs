// SPDX-License-Identifier: MIT
//
// Screen: draws one full frame per loop iteration.
//
// Layout, for a terminal of `w × h` cells:
//
//   ┌──────────────────────────────┐
//   │ text rows                    │  ← rows 0 .. h-2, from offset_line
//   ├──────────────────────────────┤
//   │ status bar (INVERSE)         │  ← row h-2
//   ├──────────────────────────────┤
//   │ prompt / message line        │  ← row h-1
//   └──────────────────────────────┘
//
// The frame is built into a byte vector with the `ansi` writers and flushed
// in one write, wrapped in synchronized output so the terminal never shows
// half of it. There is no diffing: the whole screen is rewritten each time.

use std::io::{self, Write};

use med_core::Buffer;
use med_core::column::char_len_at;
use med_term::ansi;

use crate::editor::Editor;

/// Draw the whole frame for `editor` into `out`.
///
/// The screen size is the one last passed to [`Editor::resize`].
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render(editor: &Editor, out: &mut impl Write) -> io::Result<()> {
    let buffer = editor.buffer();
    let width = buffer.screen_width();
    let height = buffer.screen_height();

    ansi::begin_sync(out)?;
    ansi::cursor_hide(out)?;
    ansi::cursor_home(out)?;

    let text_rows = height.saturating_sub(2);
    for row in 0..text_rows {
        ansi::cursor_to(out, 0, to_u16(row))?;
        let line = buffer.offset_line() + row;
        if line < buffer.num_of_lines() {
            out.write_all(&text_row(buffer, line))?;
        }
        ansi::clear_to_eol(out)?;
    }

    if let Some(row) = height.checked_sub(2) {
        ansi::cursor_to(out, 0, to_u16(row))?;
        ansi::inverse(out)?;
        out.write_all(status_line(buffer).as_bytes())?;
        ansi::reset(out)?;
    }

    if let Some(row) = height.checked_sub(1) {
        ansi::cursor_to(out, 0, to_u16(row))?;
        out.write_all(truncate(&bottom_line(editor), width).as_bytes())?;
        ansi::clear_to_eol(out)?;
    }

    if width > 0 && height > 0 {
        let (x, y) = cursor_position(editor);
        ansi::cursor_to(out, to_u16(x), to_u16(y))?;
        ansi::cursor_show(out)?;
    }

    ansi::end_sync(out)?;
    Ok(())
}

// ─── Rows ───────────────────────────────────────────────────────────────────

/// The visible part of `line`: tabs expanded to spaces, columns before
/// `offset_col` dropped, cut at the screen width.
///
/// Control bytes and malformed UTF-8 are shown as `?` so they cannot move
/// the terminal's cursor.
#[must_use]
pub fn text_row(buffer: &Buffer, line: usize) -> Vec<u8> {
    let content = buffer.content();
    let columns = buffer.columns();
    let first = buffer.offset_col();
    let last = first + buffer.screen_width();

    let mut out = Vec::with_capacity(buffer.screen_width());
    let mut col = 0;
    let mut i = buffer.line_start(line);
    let end = buffer.line_end(line);

    while i < end && col < last {
        let next = i + char_len_at(content, i, end);
        let next_col = columns.advance(col, content[i]);

        if content[i] == b'\t' {
            let visible = next_col.min(last).saturating_sub(col.max(first));
            out.extend(std::iter::repeat_n(b' ', visible));
        } else if col >= first {
            let glyph = &content[i..next];
            match std::str::from_utf8(glyph) {
                Ok(s) if !s.chars().any(char::is_control) => out.extend_from_slice(glyph),
                _ => out.push(b'?'),
            }
        }

        col = next_col;
        i = next;
    }
    out
}

/// `"{  *}{  EDIT}  {line}:{col}  {filename}"`, padded or cut to the width.
///
/// The line number is 1-based and the column is the point's byte offset
/// within its line. Control characters in the filename are shown as `?`,
/// like control bytes in a text row.
#[must_use]
pub fn status_line(buffer: &Buffer) -> String {
    let filename: String = buffer
        .filename()
        .to_string_lossy()
        .chars()
        .map(|c| if c.is_control() { '?' } else { c })
        .collect();
    let text = format!(
        "{}{}  {}:{}  {}",
        if buffer.content_changed() { "  *" } else { "" },
        if buffer.edit_mode() { "  EDIT" } else { "" },
        buffer.current_line() + 1,
        buffer.current_col(),
        filename,
    );
    let width = buffer.screen_width();
    let mut line = truncate(&text, width).to_owned();
    let used = line.chars().count();
    line.extend(std::iter::repeat_n(' ', width - used));
    line
}

/// Prompt label and input while a prompt is open, the message otherwise.
fn bottom_line(editor: &Editor) -> String {
    match editor.prompt() {
        Some(prompt) => format!("{}{}", prompt.label(), prompt.input()),
        None => editor.message().unwrap_or_default().to_owned(),
    }
}

/// Where the terminal cursor goes: after the prompt input while a prompt is
/// open, on the point otherwise. Clamped to the screen.
#[must_use]
pub fn cursor_position(editor: &Editor) -> (usize, usize) {
    let buffer = editor.buffer();
    let max_x = buffer.screen_width().saturating_sub(1);
    let max_y = buffer.screen_height().saturating_sub(1);

    if editor.prompt().is_some() {
        let x = bottom_line(editor).chars().count();
        return (x.min(max_x), max_y);
    }

    let x = buffer
        .current_virtual_col()
        .saturating_sub(buffer.offset_col());
    let y = buffer.current_line().saturating_sub(buffer.offset_line());
    (x.min(max_x), y.min(max_y))
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// The first `width` characters of `s`.
fn truncate(s: &str, width: usize) -> &str {
    s.char_indices().nth(width).map_or(s, |(i, _)| &s[..i])
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
