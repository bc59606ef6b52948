//! # med-core: editing engine for med
//!
//! One in-memory buffer per session, stored as a flat byte vector, with
//! everything needed to edit it from a terminal:
//!
//! - **[`buffer`]**: `Buffer`, the aggregate: content, filename, flags, load/save
//! - **[`line_index`]**: line-start offsets, rebuilt after every edit
//! - **[`column`]**: byte offset ↔ rendered column (tabs, UTF-8)
//! - **[`cursor`]**: point, goal column, saved point, movement commands
//! - **[`viewport`]**: scroll offsets and point/viewport reconciliation
//! - **[`edit`]**: insertion and deletion through one choke point
//! - **[`motion`]**: word and paragraph boundary scans
//! - **[`search`]**: literal substring search from the point
//! - **[`prompt`]**: input line state for search, goto line, save on quit
//! - **[`options`]**: tab width and `name=value` assignments
//! - **[`io`]**: the `FileStore` seam and its disk implementation
//! - **[`error`]**: `FileError`
//!
//! Nothing here draws or reads keys. The `med` binary owns the terminal and
//! drives a `Buffer` through its public operations.

pub mod buffer;
pub mod column;
pub mod cursor;
pub mod edit;
pub mod error;
pub mod io;
pub mod line_index;
pub mod motion;
pub mod options;
pub mod prompt;
pub mod search;
pub mod viewport;

pub use buffer::Buffer;
pub use error::FileError;
pub use options::Options;
pub use viewport::Reconcile;
