//! Text buffer: the editing aggregate.
//!
//! A `Buffer` owns the whole state of one editing session: the file's raw
//! bytes, the derived line index, the cursor, the viewport, and the column
//! mapper. Behaviour is split by concern across sibling modules, each adding
//! an `impl Buffer` block:
//!
//! | Module | Adds |
//! |--------|------|
//! | [`cursor`](crate::cursor) | point assignment and movement commands |
//! | [`viewport`](crate::viewport) | reconciliation and scrolling |
//! | [`edit`](crate::edit) | insertion and deletion |
//! | [`search`](crate::search) | substring search |
//!
//! # Storage
//!
//! Content is a flat `Vec<u8>`, read and written byte-for-byte. No encoding
//! is assumed and no newline translation happens. Offsets everywhere are
//! byte offsets; columns are converted on demand by [`ColumnMapper`].
//!
//! # Invariants
//!
//! After every public operation:
//!
//! - `point <= content.len()`
//! - the line index matches the newlines in `content`
//! - the point is inside the viewport, as far as the screen size allows

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::column::ColumnMapper;
use crate::cursor::Cursor;
use crate::error::FileError;
use crate::io::{DiskStore, FileStore};
use crate::line_index::LineIndex;
use crate::options::Options;
use crate::viewport::Viewport;

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// One file's worth of editable text, plus cursor and viewport.
pub struct Buffer {
    pub(crate) content: Vec<u8>,
    pub(crate) filename: PathBuf,
    pub(crate) lines: LineIndex,
    pub(crate) cursor: Cursor,
    pub(crate) viewport: Viewport,
    pub(crate) columns: ColumnMapper,
    pub(crate) edit_mode: bool,
    pub(crate) content_changed: bool,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Build a buffer over `content` without touching the filesystem.
    ///
    /// The point starts at 0, the viewport at the top-left corner, and the
    /// buffer is unmodified.
    #[must_use]
    pub fn from_bytes(filename: impl Into<PathBuf>, content: Vec<u8>, options: Options) -> Self {
        let lines = LineIndex::from_content(&content);
        Self {
            content,
            filename: filename.into(),
            lines,
            cursor: Cursor::default(),
            viewport: Viewport::default(),
            columns: ColumnMapper::new(options.tab_width()),
            edit_mode: false,
            content_changed: false,
        }
    }

    /// Unnamed buffer holding `text`, with default options.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(PathBuf::new(), text.as_bytes().to_vec(), Options::default())
    }

    /// Open `path` from disk with default options.
    ///
    /// A missing file is not an error: the buffer starts empty and is
    /// created on the first save.
    ///
    /// # Errors
    ///
    /// Returns a [`FileError`] if the file exists but cannot be read in full.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, FileError> {
        Self::open_with_options(path, Options::default())
    }

    /// Open `path` from disk with the given options.
    ///
    /// # Errors
    ///
    /// Returns a [`FileError`] if the file exists but cannot be read in full.
    pub fn open_with_options(path: impl Into<PathBuf>, options: Options) -> Result<Self, FileError> {
        Self::open_with(&DiskStore, path, options)
    }

    /// Open `path` through an arbitrary [`FileStore`].
    ///
    /// # Errors
    ///
    /// Returns whatever error the store reports for the read.
    pub fn open_with<S: FileStore + ?Sized>(
        store: &S,
        path: impl Into<PathBuf>,
        options: Options,
    ) -> Result<Self, FileError> {
        let filename = path.into();
        let content = match store.read_file(&filename) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(path = %filename.display(), "new file");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %filename.display(), error = %e, "load failed");
                return Err(e);
            }
        };

        let buffer = Self::from_bytes(filename, content, options);
        debug!(
            path = %buffer.filename.display(),
            bytes = buffer.content.len(),
            lines = buffer.num_of_lines(),
            "loaded"
        );
        Ok(buffer)
    }

    // -- Saving -------------------------------------------------------------

    /// Write the content back to [`filename`](Self::filename).
    ///
    /// # Errors
    ///
    /// Returns a [`FileError`] if the write fails. The buffer stays marked
    /// as changed.
    pub fn save(&mut self) -> Result<(), FileError> {
        self.save_with(&DiskStore)
    }

    /// Write the content to `path` and adopt it as the new filename.
    ///
    /// # Errors
    ///
    /// Returns a [`FileError`] if the write fails. Neither the filename nor
    /// the changed flag is touched in that case.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<(), FileError> {
        self.save_as_with(&DiskStore, path)
    }

    /// [`save`](Self::save) through an arbitrary [`FileStore`].
    ///
    /// # Errors
    ///
    /// Returns whatever error the store reports for the write.
    pub fn save_with<S: FileStore + ?Sized>(&mut self, store: &S) -> Result<(), FileError> {
        let path = self.filename.clone();
        self.write_to(store, &path)
    }

    /// [`save_as`](Self::save_as) through an arbitrary [`FileStore`].
    ///
    /// # Errors
    ///
    /// Returns whatever error the store reports for the write.
    pub fn save_as_with<S: FileStore + ?Sized>(
        &mut self,
        store: &S,
        path: impl Into<PathBuf>,
    ) -> Result<(), FileError> {
        let path = path.into();
        self.write_to(store, &path)?;
        self.filename = path;
        Ok(())
    }

    fn write_to<S: FileStore + ?Sized>(&mut self, store: &S, path: &Path) -> Result<(), FileError> {
        if let Err(e) = store.write_file(path, &self.content) {
            warn!(path = %path.display(), error = %e, "save failed");
            return Err(e);
        }
        self.content_changed = false;
        debug!(
            path = %path.display(),
            bytes = self.content.len(),
            lines = self.num_of_lines(),
            "saved"
        );
        Ok(())
    }

    // -- Content ------------------------------------------------------------

    /// The raw bytes being edited.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Path the buffer loads from and saves to.
    #[inline]
    #[must_use]
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Number of lines. An empty buffer has one.
    #[inline]
    #[must_use]
    pub fn num_of_lines(&self) -> usize {
        self.lines.len()
    }

    /// First byte of `line`. Out-of-range lines clamp to the last line.
    #[inline]
    #[must_use]
    pub fn line_start(&self, line: usize) -> usize {
        self.lines.start(line)
    }

    /// Exclusive end of `line`, not counting its newline. Out-of-range lines
    /// clamp to the last line.
    #[inline]
    #[must_use]
    pub fn line_end(&self, line: usize) -> usize {
        self.lines.end(line, self.content.len())
    }

    /// Bytes of `line` without its newline.
    #[must_use]
    pub fn line_bytes(&self, line: usize) -> &[u8] {
        &self.content[self.line_start(line)..self.line_end(line)]
    }

    // -- Cursor queries -----------------------------------------------------

    /// Byte offset of the cursor.
    #[inline]
    #[must_use]
    pub const fn point(&self) -> usize {
        self.cursor.point
    }

    /// Remembered column for vertical motion.
    #[inline]
    #[must_use]
    pub const fn goal_col(&self) -> usize {
        self.cursor.goal_col
    }

    /// Line containing the point.
    #[inline]
    #[must_use]
    pub fn current_line(&self) -> usize {
        self.lines.line_of(self.cursor.point)
    }

    /// Byte distance from the start of the current line to the point.
    #[must_use]
    pub fn current_col(&self) -> usize {
        self.cursor.point - self.line_start(self.current_line())
    }

    /// Rendered column of the point, with tabs expanded.
    #[must_use]
    pub fn current_virtual_col(&self) -> usize {
        let start = self.line_start(self.current_line());
        self.columns
            .virtual_column(&self.content, start, self.cursor.point)
    }

    // -- Viewport queries ---------------------------------------------------

    /// First visible line.
    #[inline]
    #[must_use]
    pub const fn offset_line(&self) -> usize {
        self.viewport.offset_line
    }

    /// First visible virtual column.
    #[inline]
    #[must_use]
    pub const fn offset_col(&self) -> usize {
        self.viewport.offset_col
    }

    /// Last screen width passed to [`set_screen_size`](Self::set_screen_size).
    #[inline]
    #[must_use]
    pub const fn screen_width(&self) -> usize {
        self.viewport.screen_width
    }

    /// Last screen height passed to [`set_screen_size`](Self::set_screen_size).
    #[inline]
    #[must_use]
    pub const fn screen_height(&self) -> usize {
        self.viewport.screen_height
    }

    // -- Flags --------------------------------------------------------------

    /// Whether keys insert text (`true`) or run commands (`false`).
    #[inline]
    #[must_use]
    pub const fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Switch between edit mode and command mode.
    #[inline]
    pub const fn set_edit_mode(&mut self, value: bool) {
        self.edit_mode = value;
    }

    /// True once any edit has happened since load or the last save.
    #[inline]
    #[must_use]
    pub const fn content_changed(&self) -> bool {
        self.content_changed
    }

    /// The column mapper, for renderers that expand tabs themselves.
    #[inline]
    #[must_use]
    pub const fn columns(&self) -> &ColumnMapper {
        &self.columns
    }

    /// Tab stop width in columns.
    #[inline]
    #[must_use]
    pub const fn tab_width(&self) -> usize {
        self.columns.tab_width()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("filename", &self.filename)
            .field("bytes", &self.content.len())
            .field("lines", &self.num_of_lines())
            .field("point", &self.cursor.point)
            .field("viewport", &self.viewport)
            .field("edit_mode", &self.edit_mode)
            .field("content_changed", &self.content_changed)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryStore;
    use pretty_assertions::assert_eq;

    // -- Construction -------------------------------------------------------

    #[test]
    fn empty_buffer_has_one_line() {
        let buf = Buffer::from_text("");
        assert_eq!(buf.num_of_lines(), 1);
        assert_eq!(buf.point(), 0);
        assert_eq!(buf.line_start(0), 0);
        assert_eq!(buf.line_end(0), 0);
        assert!(!buf.content_changed());
        assert!(!buf.edit_mode());
    }

    #[test]
    fn from_text_builds_line_index() {
        let buf = Buffer::from_text("ab\ncd\n");
        assert_eq!(buf.num_of_lines(), 3);
        assert_eq!(buf.line_bytes(0), b"ab");
        assert_eq!(buf.line_bytes(1), b"cd");
        assert_eq!(buf.line_bytes(2), b"");
    }

    #[test]
    fn line_queries_clamp_out_of_range() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(buf.line_start(10), 3);
        assert_eq!(buf.line_end(10), 5);
    }

    #[test]
    fn tab_width_comes_from_options() {
        let buf = Buffer::from_bytes("x", b"\tx".to_vec(), Options::new().with_tab_width(8));
        assert_eq!(buf.tab_width(), 8);
    }

    #[test]
    fn edit_mode_toggles() {
        let mut buf = Buffer::from_text("");
        buf.set_edit_mode(true);
        assert!(buf.edit_mode());
        buf.set_edit_mode(false);
        assert!(!buf.edit_mode());
    }

    // -- Cursor queries -----------------------------------------------------

    #[test]
    fn current_col_is_bytes_virtual_col_is_rendered() {
        let mut buf = Buffer::from_text("x\n\té!");
        buf.cursor.point = 6; // after 'é'
        assert_eq!(buf.current_line(), 1);
        assert_eq!(buf.current_col(), 4);
        assert_eq!(buf.current_virtual_col(), 5);
    }

    // -- File I/O -----------------------------------------------------------

    #[test]
    fn open_missing_file_starts_empty() {
        let store = MemoryStore::default();
        let buf = Buffer::open_with(&store, "new.txt", Options::default()).unwrap();
        assert_eq!(buf.content(), b"");
        assert_eq!(buf.filename(), Path::new("new.txt"));
        assert_eq!(buf.num_of_lines(), 1);
    }

    #[test]
    fn open_reads_existing_content() {
        let store = MemoryStore::with_file("a.txt", b"one\ntwo");
        let buf = Buffer::open_with(&store, "a.txt", Options::default()).unwrap();
        assert_eq!(buf.content(), b"one\ntwo");
        assert_eq!(buf.num_of_lines(), 2);
        assert!(!buf.content_changed());
    }

    #[test]
    fn save_clears_changed_flag() {
        let store = MemoryStore::with_file("a.txt", b"ab");
        let mut buf = Buffer::open_with(&store, "a.txt", Options::default()).unwrap();
        buf.end_of_buffer();
        buf.insert_character('c');
        assert!(buf.content_changed());

        buf.save_with(&store).unwrap();

        assert!(!buf.content_changed());
        assert_eq!(store.get("a.txt"), Some(b"abc".to_vec()));
    }

    #[test]
    fn failed_save_keeps_changed_flag() {
        let store = MemoryStore::failing_writes();
        let mut buf = Buffer::from_bytes("a.txt", Vec::new(), Options::default());
        buf.insert_character('x');

        assert!(buf.save_with(&store).is_err());
        assert!(buf.content_changed());
    }

    #[test]
    fn save_as_adopts_new_filename() {
        let store = MemoryStore::default();
        let mut buf = Buffer::from_bytes("old.txt", b"data".to_vec(), Options::default());

        buf.save_as_with(&store, "new.txt").unwrap();

        assert_eq!(buf.filename(), Path::new("new.txt"));
        assert_eq!(store.get("new.txt"), Some(b"data".to_vec()));
        assert_eq!(store.get("old.txt"), None);
    }

    #[test]
    fn failed_save_as_keeps_old_filename() {
        let store = MemoryStore::failing_writes();
        let mut buf = Buffer::from_bytes("old.txt", Vec::new(), Options::default());
        assert!(buf.save_as_with(&store, "new.txt").is_err());
        assert_eq!(buf.filename(), Path::new("old.txt"));
    }

    #[test]
    fn disk_roundtrip_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.txt");
        let bytes = b"caf\xc3\xa9\r\n\tline two\n\xff\xfe raw\n".to_vec();
        std::fs::write(&path, &bytes).unwrap();

        let mut buf = Buffer::open(&path).unwrap();
        assert_eq!(buf.content(), bytes.as_slice());
        buf.save().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn disk_open_missing_then_save_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.txt");

        let mut buf = Buffer::open(&path).unwrap();
        buf.insert_text("hello\n");
        buf.save().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"hello\n");
    }

    #[test]
    fn debug_format_is_compact() {
        let buf = Buffer::from_text("a\nb");
        let s = format!("{buf:?}");
        assert!(s.contains("lines: 2"));
        assert!(s.contains("bytes: 3"));
    }
}
