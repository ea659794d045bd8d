//! Reading BDF bitmap fonts
//!
//! This crate parses the [Glyph Bitmap Distribution Format][bdf] into an
//! in-memory [`Font`]: font-wide metadata plus a table of [`Glyph`]s keyed
//! by code point, each carrying its metrics and a packed 1-bit [`Bitmap`].
//!
//! Only the parts of BDF needed to build a bitmap font for a boot-time
//! renderer are interpreted; other properties are skipped.
//!
//! # Example
//!
//! ```
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
//! let glyph = font.glyph(0x41).unwrap();
//! assert_eq!(glyph.bitmap().as_bytes(), &[0b1001_0000]);
//! ```
//!
//! [bdf]: https://adobe-type-tools.github.io/font-tech-notes/pdfs/5005.BDF_Spec.pdf

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod error;
mod font;
mod glyph;
mod parse;

pub use error::FormatError;
pub use font::{Font, FontInfo, UNKNOWN_FAMILY};
pub use glyph::{Bitmap, BitmapSizeError, Glyph, InvalidHexDigit};
pub use parse::Parser;

/// The first bytes of every BDF file.
pub const BDF_SIGNATURE: &[u8] = b"STARTFONT ";

/// Parse BDF source text into a [`Font`].
pub fn parse(text: &str) -> Result<Font, FormatError> {
    Parser::new(text.lines()).parse()
}

/// Returns `true` if `data` starts with the BDF signature.
pub fn is_bdf(data: &[u8]) -> bool {
    data.starts_with(BDF_SIGNATURE)
}

/// Decode ISO-8859-1 bytes; every byte maps to the code point of equal value.
pub fn decode_latin1(data: &[u8]) -> String {
    data.iter().copied().map(char::from).collect()
}
