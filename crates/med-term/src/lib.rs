// SPDX-License-Identifier: MIT
//
// med-term: terminal layer for med.
//
// Direct terminal control over raw termios and ANSI escape sequences, with
// no TUI framework in between:
//
// - `terminal`: raw mode, alternate screen, size queries, panic-safe restore
// - `ansi`: escape sequence writers for building a frame
// - `input`: raw stdin bytes to `KeyEvent`s
// - `reader`: single-threaded wait for input, SIGWINCH flag

pub mod ansi;
pub mod input;
pub mod reader;
pub mod terminal;

pub use input::{KeyCode, KeyEvent, Modifiers, Parser};
pub use terminal::{Size, Terminal};
