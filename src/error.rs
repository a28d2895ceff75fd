//! Library-wide error and result types.

use std::io;

use thiserror::Error;

/// Result alias used throughout unarc.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the library can produce.
///
/// Open-level failures (`NotAContainer`, `MalformedHeader`) abort the whole
/// operation; the remaining variants are scoped to a single entry or call and
/// leave sibling entries usable.
#[derive(Debug, Error)]
pub enum Error {
    /// The source could not be identified as any supported container format.
    #[error("not a recognized container: {0}")]
    NotAContainer(String),

    /// Declared counts or offsets are inconsistent with the source length,
    /// or the source ends inside the header or descriptor table.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// An entry's name field could not be decoded (non-ASCII bytes, or a
    /// NUL-terminated name with no terminator before the source ends).
    #[error("entry {index}: malformed name ({reason})")]
    MalformedName { index: usize, reason: &'static str },

    /// A read ran past the end of the source.
    #[error("source truncated: needed {wanted} bytes at offset {offset:#x}")]
    TruncatedSource { offset: u64, wanted: usize },

    /// A single-entry lookup used an index outside `[0, entry_count)`.
    #[error("entry index {index} out of range for {count} entries")]
    IndexOutOfRange { index: i64, count: usize },

    /// An underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
