// SPDX-License-Identifier: MIT
//
// Key dispatch: turns `KeyEvent`s into buffer operations.
//
// med has two modes. In command mode the letters a–z are commands and Alt
// picks a command's alternate action (`l` forward char, `Alt+l` forward
// word). `f` switches to edit mode, where letters insert themselves, and
// `;` switches back. Every other key (arrows, paging, Enter, Tab, any
// printable character that is not a command letter) behaves the same in
// both modes.
//
// A prompt, once open, takes every key until it is confirmed or dismissed:
//
//   search     incremental; each edit restores the stored point and
//              searches again, Enter on empty input repeats the last pattern
//   goto line  digits only, 1-based
//   save       y saves and quits, n quits, q or Escape goes back to editing
//
// The message line shows the outcome of the last command (save result,
// failed search) and is cleared by the next key outside a prompt.

use med_core::Buffer;
use med_core::prompt::{Prompt, PromptKind};
use med_core::search::SearchDirection;
use med_term::input::{KeyCode, KeyEvent};
use tracing::debug;

// ─── Editor ─────────────────────────────────────────────────────────────────

/// Session state around the one open buffer.
pub struct Editor {
    buffer: Buffer,

    /// Open prompt, if any. Takes all keys while present.
    prompt: Option<Prompt>,

    /// Text for the bottom line. Cleared on the next keypress.
    message: Option<String>,

    /// Last confirmed search pattern, for Enter on an empty search prompt.
    last_search: String,

    quit: bool,
}

impl Editor {
    #[must_use]
    pub const fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            prompt: None,
            message: None,
            last_search: String::new(),
            quit: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    #[inline]
    #[must_use]
    pub const fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Set when the user has asked to leave and nothing is unsaved (or
    /// they chose not to save).
    #[inline]
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.quit
    }

    /// Pass a new terminal size on to the buffer.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.buffer.set_screen_size(width, height);
    }

    fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    // ── Dispatch ──────────────────────────────────────────────────────────

    /// Handle one keypress.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }

        self.message = None;

        if let KeyCode::Char(ch @ 'a'..='z') = key.code {
            if !self.buffer.edit_mode() && !key.modifiers.ctrl {
                self.run_command(ch, key.modifiers.alt);
                return;
            }
        }

        self.handle_common_key(key);
    }

    /// Command-mode letters.
    fn run_command(&mut self, ch: char, alt: bool) {
        match (ch, alt) {
            ('a', false) => self.buffer.begin_of_line(),
            ('a', true) => self.buffer.begin_of_buffer(),
            ('b', _) => self.buffer.back_to_indentation(),
            ('d', false) => self.buffer.delete_character_forward(),
            ('d', true) => self.buffer.delete_word_forward(),
            ('e', false) => self.buffer.end_of_line(),
            ('e', true) => self.buffer.end_of_buffer(),
            ('f', _) => self.buffer.set_edit_mode(true),
            ('g', _) => self.open_prompt(PromptKind::GotoLine),
            ('h', false) => self.buffer.delete_character_backward(),
            ('h', true) => self.buffer.delete_word_backward(),
            ('i', false) => self.buffer.backward_line(),
            ('i', true) => self.buffer.backward_paragraph(),
            ('j', false) => self.buffer.backward_character(),
            ('j', true) => self.buffer.backward_word(),
            ('k', false) => self.buffer.forward_line(),
            ('k', true) => self.buffer.forward_paragraph(),
            ('l', false) => self.buffer.forward_character(),
            ('l', true) => self.buffer.forward_word(),
            ('q', _) => self.request_quit(),
            ('r', _) => self.buffer.scroll_current_line_middle(),
            ('s', false) => self.open_prompt(PromptKind::Search(SearchDirection::Forward)),
            ('s', true) => self.open_prompt(PromptKind::Search(SearchDirection::Backward)),
            ('t', _) => self.buffer.delete_rest_of_line(),
            ('v', false) => self.buffer.scroll_page_down(),
            ('v', true) => self.buffer.scroll_page_up(),
            ('w', _) => {
                self.save();
            }
            _ => {}
        }
    }

    /// Keys that work the same in both modes.
    fn handle_common_key(&mut self, key: KeyEvent) {
        let alt = key.modifiers.alt;

        match key.code {
            KeyCode::Up if alt => self.buffer.scroll_up(),
            KeyCode::Down if alt => self.buffer.scroll_down(),
            KeyCode::Up => self.buffer.backward_line(),
            KeyCode::Down => self.buffer.forward_line(),
            KeyCode::Left => self.buffer.backward_character(),
            KeyCode::Right => self.buffer.forward_character(),
            KeyCode::PageUp => self.buffer.scroll_page_up(),
            KeyCode::PageDown => self.buffer.scroll_page_down(),
            KeyCode::Home => self.buffer.begin_of_line(),
            KeyCode::End => self.buffer.end_of_line(),
            KeyCode::Delete => self.buffer.delete_character_forward(),
            KeyCode::Backspace => self.buffer.delete_character_backward(),
            KeyCode::Enter => self.buffer.insert_character('\n'),
            KeyCode::Tab if !key.modifiers.shift => self.buffer.insert_character('\t'),

            KeyCode::Char(_) if key.modifiers.ctrl => {}
            KeyCode::Char(',') if alt => self.buffer.scroll_left(),
            KeyCode::Char('.') if alt => self.buffer.scroll_right(),
            KeyCode::Char(';') if alt => self.buffer.insert_character(';'),
            KeyCode::Char(';') => self.buffer.set_edit_mode(false),
            KeyCode::Char(ch) if !ch.is_control() => self.buffer.insert_character(ch),

            _ => {}
        }
    }

    // ── Saving and quitting ───────────────────────────────────────────────

    /// Save and report the outcome on the message line.
    fn save(&mut self) -> bool {
        match self.buffer.save() {
            Ok(()) => {
                let name = self.buffer.filename().display().to_string();
                let bytes = self.buffer.content().len();
                self.set_message(format!("\"{name}\" written, {bytes}B"));
                true
            }
            Err(e) => {
                self.set_message(format!("Can't save file: {e}"));
                false
            }
        }
    }

    fn request_quit(&mut self) {
        if self.buffer.content_changed() {
            self.open_prompt(PromptKind::SaveOnQuit);
        } else {
            self.quit = true;
        }
    }

    // ── Prompts ───────────────────────────────────────────────────────────

    fn open_prompt(&mut self, kind: PromptKind) {
        let prompt = Prompt::new(kind);
        if prompt.restores_point() {
            self.buffer.store_point_location();
        }
        debug!(?kind, "prompt opened");
        self.prompt = Some(prompt);
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(kind) = self.prompt.as_ref().map(Prompt::kind) else {
            return;
        };

        if kind == PromptKind::SaveOnQuit {
            self.answer_save_prompt(key);
            return;
        }

        match key.code {
            KeyCode::Escape => self.cancel_prompt(),
            KeyCode::Enter => self.confirm_prompt(),
            KeyCode::Backspace => {
                if self.prompt.as_mut().is_some_and(Prompt::backspace) {
                    self.prompt_edited();
                }
            }
            KeyCode::Char(ch) if !key.modifiers.ctrl && !key.modifiers.alt => {
                if self.prompt.as_mut().is_some_and(|p| p.insert_char(ch)) {
                    self.prompt_edited();
                }
            }
            _ => {}
        }
    }

    fn answer_save_prompt(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y' | 'Y') => {
                self.prompt = None;
                if self.save() {
                    self.quit = true;
                }
            }
            KeyCode::Char('n' | 'N') => {
                self.prompt = None;
                self.quit = true;
            }
            KeyCode::Char('q' | 'Q') | KeyCode::Escape => self.prompt = None,
            _ => {}
        }
    }

    /// Incremental search: start over from the stored point on every edit.
    fn prompt_edited(&mut self) {
        let Some(prompt) = &self.prompt else {
            return;
        };
        if let PromptKind::Search(direction) = prompt.kind() {
            let pattern = prompt.input().to_owned();
            self.buffer.restore_point_location();
            if !pattern.is_empty() {
                self.buffer.search(&pattern, direction);
            }
        }
    }

    fn cancel_prompt(&mut self) {
        if let Some(prompt) = self.prompt.take() {
            if prompt.restores_point() {
                self.buffer.restore_point_location();
            }
        }
    }

    fn confirm_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };

        match prompt.kind() {
            PromptKind::Search(direction) => self.confirm_search(prompt.input(), direction),
            PromptKind::GotoLine => {
                if let Some(line) = prompt.line_number() {
                    self.buffer.goto_line(line);
                }
            }
            PromptKind::SaveOnQuit => {}
        }
    }

    fn confirm_search(&mut self, input: &str, direction: SearchDirection) {
        if input.is_empty() {
            // Repeat from wherever the point is now.
            if self.last_search.is_empty() {
                self.set_message("No previous search");
                return;
            }
            let pattern = self.last_search.clone();
            if !self.buffer.search(&pattern, direction) {
                self.set_message(format!("Not found: {pattern}"));
            }
            return;
        }

        self.last_search = input.to_owned();

        // Redo the search from the stored point so a miss is reported and
        // leaves the point where it started.
        self.buffer.restore_point_location();
        if !self.buffer.search(input, direction) {
            self.set_message(format!("Not found: {input}"));
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
