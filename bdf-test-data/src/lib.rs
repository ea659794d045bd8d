//! test data shared between the bdf2pff2 crates.

/// A bold 16pt font with four 8x4 glyphs: `0`, `A`, `Z` and U+0391.
///
/// U+0391 has the same bitmap as `A` but different metrics.
pub static SAMPLE: &str = include_str!("../test_data/bdf/sample.bdf");

/// An italic font of unknown size with distinct glyphs for `0`, `A`, `Z`
/// and `z`, in several bounding box sizes.
pub static ALPHANUMERIC: &str = include_str!("../test_data/bdf/alphanumeric.bdf");

/// A font whose header has no `FONT_ASCENT`.
pub static MISSING_ASCENT: &str = include_str!("../test_data/bdf/missing_ascent.bdf");

/// Bytes of the `DATA` section expected for [`SAMPLE`] when no ranges are
/// given: three unique records, U+0391 sharing the record of `A`.
pub mod sample {
    #[rustfmt::skip]
    pub static GLYPH_RECORDS: &[u8] = &[
        // U+0030 at offset 0
        0x00, 0x08, 0x00, 0x04, // width 8, height 4
        0x00, 0x00, 0x00, 0x00, // x offset 0, y offset 0
        0x00, 0x08,             // device width 8
        0x3C, 0x42, 0x42, 0x3C,
        // U+0041 (and U+0391) at offset 14
        0x00, 0x08, 0x00, 0x04,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x08,
        0x18, 0x24, 0x7E, 0x42,
        // U+005A at offset 28
        0x00, 0x08, 0x00, 0x04,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x08,
        0x7E, 0x0C, 0x30, 0x7E,
    ];
}
