//! Writing PFF2 bitmap fonts
//!
//! PFF2 is the bitmap font container read by the GRUB boot loader. A file is
//! a flat sequence of tagged sections: font metadata, a character index
//! sorted by code point, and the glyph data, which runs to the end of the
//! file. Glyphs with identical bitmaps share a single data record.
//!
//! The usual entry point is [`write_font`], which writes a [`read_bdf::Font`]
//! to any seekable sink, or [`convert_file`] for a whole file-to-file
//! conversion.
//!
//! # Example
//!
//! ```
//! use write_pff2::{font_to_vec, CharacterRangeSet};
//!
//! let text = "\
//! FONT_ASCENT 7
//! FONT_DESCENT 1
//! CHARS 1
//! STARTCHAR A
//! ENCODING 65
//! DWIDTH 4 0
//! BBX 4 1 0 0
//! BITMAP
//! 90
//! ENDCHAR
//! ";
//! let font = read_bdf::parse(text).unwrap();
//! let mut ranges = CharacterRangeSet::new();
//! ranges.add(0x20..=0x7E);
//! let bytes = font_to_vec(&font, &ranges).unwrap();
//! assert!(bytes.starts_with(b"FILE\0\0\0\x04PFF2"));
//! ```

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod char_defs;
mod error;
mod font_writer;
mod ranges;
mod write;

pub use char_defs::CharDefs;
pub use error::{Error, WriteError};
pub use font_writer::{convert_file, font_to_vec, transcode, write_font};
pub use ranges::{CharacterRange, CharacterRangeSet};
pub use write::SectionWriter;

pub extern crate pff2_types as types;
pub extern crate read_bdf as read;
