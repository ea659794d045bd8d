//! Errors that occur during writing

use std::{io, path::PathBuf};

use pff2_types::Tag;
use read_bdf::FormatError;

/// An error occurred while writing a container.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WriteError {
    /// The output sink failed.
    #[error("I/O error writing font: {0}")]
    Io(#[from] io::Error),

    /// A section payload does not fit in its 32-bit length field.
    #[error("section '{tag}' is too large ({len} bytes)")]
    SectionTooLarge { tag: Tag, len: u64 },

    /// A glyph record lies beyond the reach of a 32-bit file offset.
    #[error("glyph data offset {0} does not fit in 32 bits")]
    OffsetOverflow(u64),

    /// The character index did not come out at the precomputed length.
    ///
    /// The index entries point past the index itself, so this always means
    /// the offsets written are wrong; it indicates a bug, not bad input.
    #[error("incorrect index length calculated, calc={calculated} actual={actual}")]
    IndexLengthMismatch { calculated: u64, actual: u64 },
}

/// An error from a full BDF to PFF2 conversion.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("'{}' is not a BDF file", .0.display())]
    NotBdf(PathBuf),

    #[error("cannot read '{}': {source}", .path.display())]
    ReadInput { path: PathBuf, source: io::Error },

    #[error("cannot create '{}': {source}", .path.display())]
    CreateOutput { path: PathBuf, source: io::Error },
}
