//! File error type.
//!
//! The only failures the core surfaces are I/O failures at the file boundary.
//! Everything else (out-of-range lines, offsets past the end, empty search
//! patterns) is handled by clamping or by returning `bool` / `Option`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A failed whole-file read or write.
///
/// Carries the path so the caller can report it without extra bookkeeping.
/// Never fatal inside the core; the caller decides whether to retry, prompt,
/// or abort.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file exists but could not be read.
    #[error("unable to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was read, but fewer bytes arrived than its size promised.
    #[error("unable to read {}: expected {expected} bytes, got {actual}", path.display())]
    ShortRead {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    /// The file could not be written.
    #[error("unable to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// The path involved in the failed operation.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Read { path, .. } | Self::ShortRead { path, .. } | Self::Write { path, .. } => {
                path
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_message_names_path() {
        let err = FileError::Read {
            path: PathBuf::from("notes.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("notes.txt"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn short_read_message_has_counts() {
        let err = FileError::ShortRead {
            path: PathBuf::from("a"),
            expected: 10,
            actual: 4,
        };
        assert_eq!(err.to_string(), "unable to read a: expected 10 bytes, got 4");
    }

    #[test]
    fn write_error_has_source() {
        use std::error::Error as _;
        let err = FileError::Write {
            path: PathBuf::from("out"),
            source: io::Error::other("disk full"),
        };
        assert!(err.source().is_some());
        assert_eq!(err.path(), std::path::Path::new("out"));
    }
}
