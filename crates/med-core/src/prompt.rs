//! Prompt: one-line input for search, goto line, and save-on-quit.
//!
//! A prompt owns only its label and the text typed so far. The key dispatch
//! layer opens one, routes keys into it, and acts on the input when the user
//! confirms. Search and goto-line prompts are cancelable: the buffer's saved
//! point is stored when they open and restored on Escape.
//!
//! | Kind | Label | Input |
//! |------|-------|-------|
//! | search forward | `Search: ` | literal pattern |
//! | search backward | `Search backward: ` | literal pattern |
//! | goto line | `Goto line: ` | 1-based line number |
//! | save on quit | `Save changes (y/n/q)? ` | single key, not echoed |

use std::num::IntErrorKind;

use crate::search::SearchDirection;

/// What a prompt is asking for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PromptKind {
    Search(SearchDirection),
    GotoLine,
    SaveOnQuit,
}

/// Transient state of an open prompt.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Prompt {
    kind: PromptKind,
    input: String,
}

impl Prompt {
    /// Open an empty prompt.
    #[must_use]
    pub const fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> PromptKind {
        self.kind
    }

    /// Text typed so far.
    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Text shown before the input.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self.kind {
            PromptKind::Search(SearchDirection::Forward) => "Search: ",
            PromptKind::Search(SearchDirection::Backward) => "Search backward: ",
            PromptKind::GotoLine => "Goto line: ",
            PromptKind::SaveOnQuit => "Save changes (y/n/q)? ",
        }
    }

    /// Whether Escape should put the point back where it was.
    #[must_use]
    pub const fn restores_point(&self) -> bool {
        matches!(self.kind, PromptKind::Search(_) | PromptKind::GotoLine)
    }

    /// Append a character. Goto-line prompts only take ASCII digits; the
    /// save prompt takes nothing. Returns whether the input changed.
    pub fn insert_char(&mut self, ch: char) -> bool {
        let accepted = match self.kind {
            PromptKind::Search(_) => !ch.is_control(),
            PromptKind::GotoLine => ch.is_ascii_digit(),
            PromptKind::SaveOnQuit => false,
        };
        if accepted {
            self.input.push(ch);
        }
        accepted
    }

    /// Delete the last character. Returns `false` if the input was empty.
    pub fn backspace(&mut self) -> bool {
        self.input.pop().is_some()
    }

    /// The input as a 0-based line index, for a 1-based number typed by the
    /// user. `0` is treated as `1`, and a number too large for `usize`
    /// saturates so the buffer clamps it to its last line. Returns `None` if
    /// nothing parses.
    #[must_use]
    pub fn line_number(&self) -> Option<usize> {
        let n = match self.input.parse::<usize>() {
            Ok(n) => n,
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => usize::MAX,
            Err(_) => return None,
        };
        Some(n.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search() -> Prompt {
        Prompt::new(PromptKind::Search(SearchDirection::Forward))
    }

    #[test]
    fn new_prompt_is_empty() {
        let p = search();
        assert!(p.is_empty());
        assert_eq!(p.input(), "");
        assert_eq!(p.label(), "Search: ");
    }

    #[test]
    fn labels_per_kind() {
        let back = Prompt::new(PromptKind::Search(SearchDirection::Backward));
        assert_eq!(back.label(), "Search backward: ");
        assert_eq!(Prompt::new(PromptKind::GotoLine).label(), "Goto line: ");
        assert_eq!(
            Prompt::new(PromptKind::SaveOnQuit).label(),
            "Save changes (y/n/q)? "
        );
    }

    #[test]
    fn search_input_takes_any_printable_char() {
        let mut p = search();
        assert!(p.insert_char('a'));
        assert!(p.insert_char(' '));
        assert!(p.insert_char('ñ'));
        assert!(!p.insert_char('\n'));
        assert_eq!(p.input(), "a ñ");
    }

    #[test]
    fn backspace_removes_whole_chars() {
        let mut p = search();
        p.insert_char('a');
        p.insert_char('ñ');
        assert!(p.backspace());
        assert_eq!(p.input(), "a");
        assert!(p.backspace());
        assert!(!p.backspace());
    }

    #[test]
    fn goto_line_takes_digits_only() {
        let mut p = Prompt::new(PromptKind::GotoLine);
        assert!(p.insert_char('4'));
        assert!(!p.insert_char('x'));
        assert!(p.insert_char('2'));
        assert_eq!(p.input(), "42");
        assert_eq!(p.line_number(), Some(41));
    }

    #[test]
    fn line_number_edge_cases() {
        let mut p = Prompt::new(PromptKind::GotoLine);
        assert_eq!(p.line_number(), None);
        p.insert_char('0');
        assert_eq!(p.line_number(), Some(0));
    }

    #[test]
    fn oversized_line_number_saturates() {
        let mut p = Prompt::new(PromptKind::GotoLine);
        for ch in "99999999999999999999999999".chars() {
            assert!(p.insert_char(ch));
        }
        assert_eq!(p.line_number(), Some(usize::MAX - 1));
    }

    #[test]
    fn save_prompt_ignores_input() {
        let mut p = Prompt::new(PromptKind::SaveOnQuit);
        assert!(!p.insert_char('y'));
        assert!(p.is_empty());
        assert!(!p.restores_point());
    }

    #[test]
    fn cancelable_kinds_restore_point() {
        assert!(search().restores_point());
        assert!(Prompt::new(PromptKind::GotoLine).restores_point());
    }
}
