// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Terminal session: the raw, full-screen state med draws into.
//
// `Terminal::enter` is the only way in, and it does everything at once:
//
//   termios raw mode → SIGWINCH handler → alternate screen, cursor hidden
//
// Holding a `Terminal` means the session is live. Dropping it, or calling
// `leave` to see the errors, writes `ansi::leave_full_screen` and puts the
// saved termios back.
//
// Raw mode keeps `VMIN = 1, VTIME = 0`. The reader only calls `read` after
// `poll` reports input, so a read never blocks, and the ESC timeout is the
// poll timeout rather than a termios one.
//
// A panic can unwind while stdout is locked mid-frame. The panic hook
// therefore writes the leave sequence straight to fd 1 and restores termios
// from a process-wide copy before the default hook prints its message.

use std::io::{self, Write};
#[cfg(unix)]
use std::sync::Mutex;
use std::sync::Once;

use crate::{ansi, reader};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used when stdout is not a terminal.
    pub const DEFAULT: Self = Self { cols: 80, rows: 24 };

    /// Ask the kernel for the size of the terminal on stdout.
    ///
    /// `None` if stdout is not a terminal or reports a zero dimension.
    #[cfg(unix)]
    #[must_use]
    pub fn query() -> Option<Self> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let ok = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) } == 0;
        (ok && ws.ws_col > 0 && ws.ws_row > 0).then_some(Self {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    }

    #[cfg(not(unix))]
    #[must_use]
    pub fn query() -> Option<Self> {
        None
    }

    #[inline]
    #[must_use]
    pub const fn width(self) -> usize {
        self.cols as usize
    }

    #[inline]
    #[must_use]
    pub const fn height(self) -> usize {
        self.rows as usize
    }
}

#[cfg(unix)]
fn stdin_is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
fn stdin_is_tty() -> bool {
    false
}

// ─── Raw mode ───────────────────────────────────────────────────────────────

/// The termios in effect before med started, for the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Stdin switched to raw mode. Holds the settings to go back to.
#[cfg(unix)]
struct RawMode {
    original: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    fn enable() -> io::Result<Self> {
        let fd = libc::STDIN_FILENO;
        let mut original: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut original) } != 0 {
            return Err(io::Error::last_os_error());
        }

        // ISIG goes too: Ctrl+C and Ctrl+Z arrive as keys.
        let mut termios = original;
        unsafe { libc::cfmakeraw(&raw mut termios) };
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;

        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = Some(original);
        }
        Ok(Self { original })
    }

    fn disable(&self) -> io::Result<()> {
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = None;
        }
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const self.original) }
            != 0
        {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(not(unix))]
struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    #[allow(clippy::unnecessary_wraps)]
    const fn enable() -> io::Result<Self> {
        Ok(Self)
    }

    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    const fn disable(&self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Panic hook ─────────────────────────────────────────────────────────────

static PANIC_HOOK: Once = Once::new();

/// The bytes the panic hook writes: [`ansi::leave_full_screen`], prebuilt.
fn restore_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = ansi::leave_full_screen(&mut bytes);
    bytes
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let restore = restore_bytes();
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            write_to_stdout_fd(&restore);

            #[cfg(unix)]
            if let Ok(saved) = SAVED_TERMIOS.lock() {
                if let Some(original) = saved.as_ref() {
                    unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original) };
                }
            }

            previous(info);
        }));
    });
}

/// Write without taking the stdout lock, which a panicking frame may hold.
#[cfg(unix)]
fn write_to_stdout_fd(bytes: &[u8]) {
    unsafe {
        libc::write(
            libc::STDOUT_FILENO,
            bytes.as_ptr().cast::<libc::c_void>(),
            bytes.len(),
        );
    }
}

#[cfg(not(unix))]
fn write_to_stdout_fd(bytes: &[u8]) {
    let mut out = io::stdout();
    let _ = out.write_all(bytes);
    let _ = out.flush();
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// A live full-screen session on the controlling terminal.
///
/// ```no_run
/// use med_term::terminal::Terminal;
///
/// let term = Terminal::enter()?;
/// // ... draw frames, wait for keys ...
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    /// `None` once the session has been handed back.
    raw: Option<RawMode>,
    size: Size,
}

impl Terminal {
    /// Take over the terminal: raw mode, SIGWINCH handler, alternate screen.
    ///
    /// # Errors
    ///
    /// `Unsupported` if stdin is not a terminal, or the OS error from
    /// termios or from writing to stdout. The terminal is handed back
    /// before an error is returned.
    pub fn enter() -> io::Result<Self> {
        if !stdin_is_tty() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "stdin is not a terminal",
            ));
        }

        install_panic_hook();
        let raw = RawMode::enable()?;
        reader::install_resize_handler();

        // From here on, Drop undoes everything if the setup write fails.
        let term = Self {
            raw: Some(raw),
            size: Size::query().unwrap_or(Size::DEFAULT),
        };
        let mut out = io::stdout().lock();
        ansi::enter_full_screen(&mut out)?;
        out.flush()?;
        drop(out);
        Ok(term)
    }

    /// Size as of [`enter`](Self::enter) or the last
    /// [`refresh_size`](Self::refresh_size).
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Query the size again, after a SIGWINCH. Keeps the old size if the
    /// query fails.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = Size::query() {
            self.size = size;
        }
        self.size
    }

    /// End the session, reporting any error that dropping would swallow.
    ///
    /// # Errors
    ///
    /// Returns the error from writing to stdout or restoring termios.
    pub fn leave(mut self) -> io::Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> io::Result<()> {
        let Some(raw) = self.raw.take() else {
            return Ok(());
        };

        let written = {
            let mut out = io::stdout().lock();
            ansi::leave_full_screen(&mut out).and_then(|()| out.flush())
        };
        // Termios comes back even when the write failed.
        raw.disable()?;
        written
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
