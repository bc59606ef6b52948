// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into `KeyEvent`s:
//
// - ASCII printable characters and UTF-8 multi-byte characters
// - Control bytes (Ctrl+letter, Enter, Tab, Backspace)
// - Alt+key (ESC followed by a key, including ESC before a sequence)
// - CSI and SS3 sequences, looked up in a static table, with the xterm
//   modifier form (`ESC [ 1 ; 5 A`, `ESC [ 3 ; 2 ~`) decoded on top
//
// # Design
//
// The parser keeps a small byte buffer because a sequence can be split
// across `read()` calls. Feed bytes with [`Parser::advance`] and take the
// keys it returns. A lone ESC stays pending: after a short timeout with no
// new bytes, call [`Parser::flush`] to emit it as a real Escape keypress.

// ─── Key Types ──────────────────────────────────────────────────────────────

/// A keypress with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[inline]
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key with no modifiers held.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::NONE)
    }

    /// Same key with extra modifiers added.
    #[inline]
    #[must_use]
    pub const fn with(self, modifiers: Modifiers) -> Self {
        Self::new(self.code, self.modifiers.union(modifiers))
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::plain(code)
    }
}

/// Identity of a key.
///
/// Printable characters use [`Char`](KeyCode::Char). Ctrl+letter arrives
/// as the lowercase letter with `ctrl` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    // ── Function keys ───────────────────────────────────────────
    /// F1 through F12.
    F(u8),
}

/// Modifier keys held during a keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Both sets of modifiers.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            ctrl: self.ctrl || other.ctrl,
            alt: self.alt || other.alt,
            shift: self.shift || other.shift,
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        !(self.ctrl || self.alt || self.shift)
    }

    /// Decode the xterm modifier parameter, `1 + bitmask` with
    /// shift = 1, alt = 2, ctrl = 4, meta = 8. Meta counts as alt.
    const fn from_xterm(param: u16) -> Self {
        let bits = param.saturating_sub(1);
        Self {
            shift: bits & 1 != 0,
            alt: bits & (2 | 8) != 0,
            ctrl: bits & 4 != 0,
        }
    }
}

// ─── Escape Table ───────────────────────────────────────────────────────────

/// Known CSI / SS3 sequences, without the leading ESC.
///
/// Only the unmodified forms are listed. `lookup` rewrites the xterm
/// modifier form (`[1;5A` → `[A`, `[3;5~` → `[3~`) onto these entries.
static ESCAPE_TABLE: &[(&[u8], KeyEvent)] = &[
    // Cursor keys, normal and application mode.
    (b"[A", KeyEvent::plain(KeyCode::Up)),
    (b"[B", KeyEvent::plain(KeyCode::Down)),
    (b"[C", KeyEvent::plain(KeyCode::Right)),
    (b"[D", KeyEvent::plain(KeyCode::Left)),
    (b"[H", KeyEvent::plain(KeyCode::Home)),
    (b"[F", KeyEvent::plain(KeyCode::End)),
    (b"OA", KeyEvent::plain(KeyCode::Up)),
    (b"OB", KeyEvent::plain(KeyCode::Down)),
    (b"OC", KeyEvent::plain(KeyCode::Right)),
    (b"OD", KeyEvent::plain(KeyCode::Left)),
    (b"OH", KeyEvent::plain(KeyCode::Home)),
    (b"OF", KeyEvent::plain(KeyCode::End)),
    // Editing keypad (vt220 and rxvt variants).
    (b"[1~", KeyEvent::plain(KeyCode::Home)),
    (b"[7~", KeyEvent::plain(KeyCode::Home)),
    (b"[2~", KeyEvent::plain(KeyCode::Insert)),
    (b"[3~", KeyEvent::plain(KeyCode::Delete)),
    (b"[4~", KeyEvent::plain(KeyCode::End)),
    (b"[8~", KeyEvent::plain(KeyCode::End)),
    (b"[5~", KeyEvent::plain(KeyCode::PageUp)),
    (b"[6~", KeyEvent::plain(KeyCode::PageDown)),
    // Function keys.
    (b"OP", KeyEvent::plain(KeyCode::F(1))),
    (b"OQ", KeyEvent::plain(KeyCode::F(2))),
    (b"OR", KeyEvent::plain(KeyCode::F(3))),
    (b"OS", KeyEvent::plain(KeyCode::F(4))),
    (b"[P", KeyEvent::plain(KeyCode::F(1))),
    (b"[Q", KeyEvent::plain(KeyCode::F(2))),
    (b"[R", KeyEvent::plain(KeyCode::F(3))),
    (b"[S", KeyEvent::plain(KeyCode::F(4))),
    (b"[11~", KeyEvent::plain(KeyCode::F(1))),
    (b"[12~", KeyEvent::plain(KeyCode::F(2))),
    (b"[13~", KeyEvent::plain(KeyCode::F(3))),
    (b"[14~", KeyEvent::plain(KeyCode::F(4))),
    (b"[15~", KeyEvent::plain(KeyCode::F(5))),
    (b"[17~", KeyEvent::plain(KeyCode::F(6))),
    (b"[18~", KeyEvent::plain(KeyCode::F(7))),
    (b"[19~", KeyEvent::plain(KeyCode::F(8))),
    (b"[20~", KeyEvent::plain(KeyCode::F(9))),
    (b"[21~", KeyEvent::plain(KeyCode::F(10))),
    (b"[23~", KeyEvent::plain(KeyCode::F(11))),
    (b"[24~", KeyEvent::plain(KeyCode::F(12))),
    // Back-tab.
    (b"[Z", KeyEvent::new(KeyCode::Tab, Modifiers::SHIFT)),
];

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Terminal input parser.
///
/// Feed raw bytes via [`advance`](Parser::advance). Incomplete sequences
/// stay buffered and are resumed when more bytes arrive.
///
/// # Escape vs escape-sequence ambiguity
///
/// A bare `ESC` byte could be the Escape key or the start of a sequence.
/// The parser holds it until either more bytes arrive or the caller gives
/// up waiting and calls [`flush`](Parser::flush).
pub struct Parser {
    /// Raw bytes not yet turned into keys.
    buf: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed raw bytes from stdin and return every key that can be parsed.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut keys = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Key(key, consumed) => {
                    keys.push(key);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }
        keys
    }

    /// Are there buffered bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Give up on completing the pending bytes and emit them as keys.
    ///
    /// A lone ESC becomes Escape; leftover printable or control bytes
    /// become their own keys; stray UTF-8 fragments are dropped.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let keys = self
            .buf
            .iter()
            .filter_map(|&byte| match byte {
                0x1B => Some(KeyEvent::plain(KeyCode::Escape)),
                0x00..=0x7F => match try_parse(&[byte]) {
                    Parsed::Key(key, _) => Some(key),
                    Parsed::Incomplete | Parsed::Skip(_) => None,
                },
                _ => None,
            })
            .collect();
        self.buf.clear();
        keys
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────
//
// Each function reads from the front of `buf` and reports what it found
// plus how many bytes to consume.

/// Result of trying to parse one key from the front of the buffer.
enum Parsed {
    /// A key, consuming `usize` bytes.
    Key(KeyEvent, usize),
    /// Need more bytes.
    Incomplete,
    /// Unrecognized byte(s); skip `usize` (always at least 1) bytes.
    Skip(usize),
}

/// Parse one key from `buf`, which must not be empty.
fn try_parse(buf: &[u8]) -> Parsed {
    match buf[0] {
        0x1B => parse_escape(buf),
        0x00 => Parsed::Key(KeyEvent::new(KeyCode::Char('@'), Modifiers::CTRL), 1),
        0x08 | 0x7F => Parsed::Key(KeyEvent::plain(KeyCode::Backspace), 1),
        0x09 => Parsed::Key(KeyEvent::plain(KeyCode::Tab), 1),
        0x0A | 0x0D => Parsed::Key(KeyEvent::plain(KeyCode::Enter), 1),
        b @ (0x01..=0x07 | 0x0B..=0x0C | 0x0E..=0x1A) => Parsed::Key(
            KeyEvent::new(KeyCode::Char((b + b'a' - 1) as char), Modifiers::CTRL),
            1,
        ),
        b @ 0x20..=0x7E => Parsed::Key(KeyEvent::plain(KeyCode::Char(b as char)), 1),
        0xC0..=0xFF => parse_utf8(buf),
        // 0x1C..=0x1F and bare continuation bytes.
        _ => Parsed::Skip(1),
    }
}

// ── Escape sequences ────────────────────────────────────────────────────────

fn parse_escape(buf: &[u8]) -> Parsed {
    debug_assert_eq!(buf[0], 0x1B);

    let Some(&next) = buf.get(1) else {
        return Parsed::Incomplete;
    };

    match next {
        b'[' | b'O' => parse_sequence(buf),
        // ESC ESC: either Alt+Escape or ESC prefixed to a sequence
        // (some terminals send Alt+Up as `ESC ESC [ A`).
        0x1B => match buf.get(2) {
            None => Parsed::Incomplete,
            Some(b'[' | b'O') => with_alt(parse_sequence(&buf[1..])),
            Some(_) => Parsed::Key(KeyEvent::new(KeyCode::Escape, Modifiers::ALT), 2),
        },
        _ => with_alt(try_parse(&buf[1..])),
    }
}

/// Add Alt to a key parsed after a leading ESC. If nothing valid follows
/// the ESC, the ESC is the Escape key on its own.
fn with_alt(parsed: Parsed) -> Parsed {
    match parsed {
        Parsed::Key(key, consumed) => Parsed::Key(key.with(Modifiers::ALT), consumed + 1),
        Parsed::Incomplete => Parsed::Incomplete,
        Parsed::Skip(_) => Parsed::Key(KeyEvent::plain(KeyCode::Escape), 1),
    }
}

/// Parse `ESC [ params final` or `ESC O final`.
fn parse_sequence(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B);

    let end = if buf[1] == b'O' {
        if buf.len() < 3 {
            return Parsed::Incomplete;
        }
        2
    } else {
        // Parameter bytes are 0x30..=0x3F, intermediates 0x20..=0x2F, and
        // the final byte is 0x40..=0x7E.
        let mut end = 2;
        loop {
            let Some(&b) = buf.get(end) else {
                return Parsed::Incomplete;
            };
            match b {
                0x40..=0x7E => break,
                0x20..=0x3F => end += 1,
                // Abort; the offending byte is parsed on its own.
                _ => return Parsed::Skip(end),
            }
        }
        end
    };

    let consumed = end + 1;
    lookup(&buf[1..consumed]).map_or(Parsed::Skip(consumed), |key| {
        Parsed::Key(key, consumed)
    })
}

/// Resolve a sequence body (everything after ESC) to a key.
fn lookup(body: &[u8]) -> Option<KeyEvent> {
    if let Some(key) = find_entry(body) {
        return Some(key);
    }

    // xterm modifier form: `[ first ; modifier final`.
    let (&final_byte, params) = body.get(1..)?.split_last()?;
    let split = params.iter().position(|&b| b == b';')?;
    let modifiers = Modifiers::from_xterm(parse_number(&params[split + 1..])?);

    let mut canonical = Vec::with_capacity(split + 2);
    canonical.push(body[0]);
    if final_byte == b'~' {
        canonical.extend_from_slice(&params[..split]);
    }
    canonical.push(final_byte);

    find_entry(&canonical).map(|key| key.with(modifiers))
}

fn find_entry(body: &[u8]) -> Option<KeyEvent> {
    ESCAPE_TABLE
        .iter()
        .find(|(seq, _)| *seq == body)
        .map(|&(_, key)| key)
}

/// Parse a non-empty run of ASCII digits.
fn parse_number(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(digits.iter().fold(0u16, |acc, &d| {
        acc.saturating_mul(10).saturating_add(u16::from(d - b'0'))
    }))
}

// ── UTF-8 ──────────────────────────────────────────────────────────────────

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8_char_len(buf[0]);

    if expected == 0 {
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        // Only wait if what we have so far is a valid prefix.
        return if buf[1..].iter().all(|&b| b & 0xC0 == 0x80) {
            Parsed::Incomplete
        } else {
            Parsed::Skip(1)
        };
    }

    std::str::from_utf8(&buf[..expected])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Parsed::Skip(1), |ch| {
            Parsed::Key(KeyEvent::plain(KeyCode::Char(ch)), expected)
        })
}

/// Expected byte length of a UTF-8 character from its lead byte.
/// Returns 0 for invalid lead bytes.
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
