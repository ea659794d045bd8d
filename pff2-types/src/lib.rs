//! Common scalar types and constants of the PFF2 font container
//!
//! A PFF2 file is a flat sequence of sections. Each section starts with a
//! four-byte [`Tag`], followed by a big-endian `u32` payload length and the
//! payload itself. The final section (`DATA`) uses [`UNBOUNDED_SECTION_LEN`]
//! as its length, meaning "the rest of the file".

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod tag;

pub use tag::{InvalidTag, Tag};

/// The payload of the `FILE` section, identifying the container format.
pub const FILE_MAGIC: &[u8; 4] = b"PFF2";

/// The length written for a section that extends to the end of the file.
///
/// This is `-1` when interpreted as a signed 32-bit integer.
pub const UNBOUNDED_SECTION_LEN: u32 = 0xFFFF_FFFF;

/// The size of a section header: a four-byte tag and a four-byte length.
pub const SECTION_HEADER_LEN: u32 = 8;

/// The size of one `CHIX` entry: code point (4), storage flags (1), offset (4).
pub const CHAR_INDEX_ENTRY_LEN: u32 = 4 + 1 + 4;

/// The size of the fixed fields preceding each glyph bitmap in `DATA`:
/// width, height, x offset, y offset and device width, two bytes each.
pub const GLYPH_HEADER_LEN: usize = 2 * 5;

/// Storage flags for a `CHIX` entry.
///
/// Bits 1..0 describe the compression of the glyph record. Only
/// uncompressed records are produced.
pub mod storage_flags {
    /// The glyph record is stored uncompressed.
    pub const UNCOMPRESSED: u8 = 0b00;
}

/// Tags of the sections in a PFF2 container, in the order they are written.
pub mod sections {
    use crate::Tag;

    /// File type identifier; payload is [`FILE_MAGIC`](crate::FILE_MAGIC).
    pub const FILE: Tag = Tag::new(b"FILE");
    /// Full font name, e.g. `"Fixed Bold 16"`.
    pub const FONT_NAME: Tag = Tag::new(b"NAME");
    /// Font family name.
    pub const FONT_FAMILY: Tag = Tag::new(b"FAMI");
    /// `"bold"` or `"normal"`.
    pub const FONT_WEIGHT: Tag = Tag::new(b"WEIG");
    /// `"italic"` or `"normal"`.
    pub const FONT_SLANT: Tag = Tag::new(b"SLAN");
    /// Point size, as a 16-bit integer.
    pub const FONT_POINT_SIZE: Tag = Tag::new(b"PTSZ");
    /// Maximum glyph width in pixels.
    pub const MAX_CHAR_WIDTH: Tag = Tag::new(b"MAXW");
    /// Maximum glyph height in pixels.
    pub const MAX_CHAR_HEIGHT: Tag = Tag::new(b"MAXH");
    /// Font ascent in pixels.
    pub const FONT_ASCENT: Tag = Tag::new(b"ASCE");
    /// Font descent in pixels.
    pub const FONT_DESCENT: Tag = Tag::new(b"DESC");
    /// The character index, sorted by code point.
    pub const CHAR_INDEX: Tag = Tag::new(b"CHIX");
    /// Glyph records; this section extends to the end of the file.
    pub const REMAINDER_IS_DATA: Tag = Tag::new(b"DATA");
}
