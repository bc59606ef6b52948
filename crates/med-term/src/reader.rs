// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Stdin reader: waits for terminal input on the calling thread.
//
// The editor is single-threaded: the main loop draws, then blocks here
// until bytes arrive. `wait_for_input` polls stdin and reads whatever is
// available in one chunk.
//
// Two things wake the wait early:
//
//   - A timeout. The loop passes a short one while the input parser holds
//     a lone ESC, so the Escape key is delivered once no follow-up bytes
//     arrive.
//
//   - SIGWINCH. The handler only sets an atomic flag. It is installed
//     without SA_RESTART, so `poll` returns EINTR and the loop gets to
//     redraw at the new size right away.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Byte chunk read from stdin.
///
/// A single keypress is 1-6 bytes, a paste can be kilobytes.
const READ_BUF_SIZE: usize = 4096;

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

/// Global flag set by the SIGWINCH handler.
static RESIZE_PENDING: AtomicBool = AtomicBool::new(false);

/// Install the SIGWINCH handler. Safe to call more than once.
#[cfg(unix)]
pub fn install_resize_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    RESIZE_PENDING.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
pub fn install_resize_handler() {}

/// Whether a resize arrived since the last call. Clears the flag.
#[must_use]
pub fn take_resize() -> bool {
    RESIZE_PENDING.swap(false, Ordering::Relaxed)
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Wait for stdin to become readable, then read what is there.
///
/// `None` as the timeout blocks until input or a signal. Returns
/// `Ok(None)` when the timeout expires or a signal interrupts the wait,
/// and `Ok(Some(bytes))` with a non-empty chunk otherwise.
///
/// # Errors
///
/// Returns an error if `poll` or `read` fails for any reason other than
/// an interrupt, or `UnexpectedEof` if stdin is closed.
#[cfg(unix)]
pub fn wait_for_input(timeout: Option<Duration>) -> io::Result<Option<Vec<u8>>> {
    use std::os::unix::io::AsRawFd;

    let fd = io::stdin().as_raw_fd();
    let timeout_ms = timeout.map_or(-1, |t| i32::try_from(t.as_millis()).unwrap_or(i32::MAX));

    let ready = unsafe {
        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };
        libc::poll(&raw mut pfd, 1, timeout_ms)
    };

    if ready < 0 {
        let err = io::Error::last_os_error();
        return if err.kind() == io::ErrorKind::Interrupted {
            Ok(None)
        } else {
            Err(err)
        };
    }
    if ready == 0 {
        return Ok(None);
    }

    let mut buf = [0u8; READ_BUF_SIZE];
    let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };

    if n < 0 {
        let err = io::Error::last_os_error();
        return if err.kind() == io::ErrorKind::Interrupted {
            Ok(None)
        } else {
            Err(err)
        };
    }
    if n == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }

    #[allow(clippy::cast_sign_loss)] // n > 0 checked above.
    Ok(Some(buf[..n as usize].to_vec()))
}

/// Non-unix fallback: a plain blocking read that ignores the timeout.
#[cfg(not(unix))]
pub fn wait_for_input(_timeout: Option<Duration>) -> io::Result<Option<Vec<u8>>> {
    use std::io::Read;

    let mut buf = [0u8; READ_BUF_SIZE];
    match io::stdin().lock().read(&mut buf)? {
        0 => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed")),
        n => Ok(Some(buf[..n].to_vec())),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
