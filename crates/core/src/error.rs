//! Error types for legacy Office text extraction.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting text from a compound document.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file extension or content is not handled by any extractor.
    #[error("Unsupported or unrecognized file format: {0}")]
    UnsupportedFormat(String),

    /// The buffer is not a compound file (bad signature or impossible geometry).
    #[error("Invalid compound file: {0}")]
    InvalidFormat(String),

    /// A named stream required by the extractor is absent from the directory.
    #[error("Required stream '{0}' not found")]
    MissingStream(String),

    /// The directory has no "Root Entry", so the mini-stream cannot be located.
    #[error("Root Entry not found in compound file directory")]
    MissingRootEntry,

    /// A PowerPoint persist id does not resolve through the persist directory.
    #[error("Persist object {0} not found in persist directory")]
    MissingPersistEntry(u32),

    /// The Word CLX block does not contain a recognizable piece table.
    #[error("Malformed piece table: {0}")]
    MalformedPieceTable(String),

    /// An offset or length computed from file fields exceeds the buffer.
    #[error("Truncated data: {len} bytes at offset {offset} exceed buffer of {available} bytes")]
    TruncatedData {
        offset: usize,
        len: usize,
        available: usize,
    },

    /// A PowerPoint record required at a resolved offset is absent.
    #[error("Expected record type {expected:#06X} at offset {offset}")]
    UnexpectedRecord { expected: u16, offset: usize },
}

impl Error {
    /// Build a [`Error::TruncatedData`] for a read of `len` bytes at `offset`.
    pub fn truncated(offset: usize, len: usize, available: usize) -> Self {
        Error::TruncatedData {
            offset,
            len,
            available,
        }
    }
}
