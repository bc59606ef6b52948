//! File I/O seam.
//!
//! The buffer never touches the filesystem directly. It goes through a
//! [`FileStore`], which moves whole files as raw bytes: no encoding
//! transformation, no newline translation. [`DiskStore`] is the real
//! implementation; tests swap in an in-memory one.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use crate::error::FileError;

/// Whole-file, blocking, binary-exact storage.
pub trait FileStore {
    /// Read the full contents of `path`.
    ///
    /// Returns `Ok(None)` if the file does not exist. A new file is not an
    /// error; the buffer simply starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::Read`] if the file exists but cannot be read, or
    /// [`FileError::ShortRead`] if fewer bytes arrive than its size.
    fn read_file(&self, path: &Path) -> Result<Option<Vec<u8>>, FileError>;

    /// Replace the contents of `path` with `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::Write`] if the write fails.
    fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<(), FileError>;
}

/// [`FileStore`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl FileStore for DiskStore {
    fn read_file(&self, path: &Path) -> Result<Option<Vec<u8>>, FileError> {
        let read_err = |source: io::Error| FileError::Read {
            path: path.to_path_buf(),
            source,
        };

        let expected = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(read_err(e)),
        };

        let mut file = File::open(path).map_err(read_err)?;
        let mut bytes = Vec::with_capacity(usize::try_from(expected).unwrap_or(0));
        file.read_to_end(&mut bytes).map_err(read_err)?;

        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        if actual < expected {
            return Err(FileError::ShortRead {
                path: path.to_path_buf(),
                expected,
                actual,
            });
        }

        Ok(Some(bytes))
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<(), FileError> {
        fs::write(path, bytes).map_err(|source| FileError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// In-memory [`FileStore`] for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    files: std::cell::RefCell<std::collections::HashMap<std::path::PathBuf, Vec<u8>>>,
    fail_writes: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub(crate) fn with_file(path: &str, bytes: &[u8]) -> Self {
        let store = Self::default();
        store
            .files
            .borrow_mut()
            .insert(path.into(), bytes.to_vec());
        store
    }

    pub(crate) fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub(crate) fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(Path::new(path)).cloned()
    }
}

#[cfg(test)]
impl FileStore for MemoryStore {
    fn read_file(&self, path: &Path) -> Result<Option<Vec<u8>>, FileError> {
        Ok(self.files.borrow().get(path).cloned())
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<(), FileError> {
        if self.fail_writes {
            return Err(FileError::Write {
                path: path.to_path_buf(),
                source: io::Error::other("read-only store"),
            });
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}
