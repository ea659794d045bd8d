//! Deduplicated glyph records and the index pointing at them

use std::collections::{hash_map::Entry, BTreeMap, HashMap};

use read_bdf::{Font, Glyph};

use crate::{ranges::CharacterRangeSet, WriteError};

/// The glyph definitions of a font, with identical bitmaps stored once.
///
/// Each unique bitmap is written as a record of five big-endian 16-bit
/// fields (width, height, x offset, y offset, device width) followed by the
/// packed bitmap bytes. Glyphs whose bitmaps match an earlier record share
/// that record, metrics included.
#[derive(Clone, Debug, Default)]
pub struct CharDefs {
    data: Vec<u8>,
    /// code point -> offset of its record in `data`
    index: BTreeMap<u32, u32>,
    unique_count: usize,
    max_width: u16,
    max_height: u16,
}

/// The parts of a glyph that determine how it looks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GlyphKey<'a> {
    width: u16,
    height: u16,
    bitmap: &'a [u8],
}

impl<'a> GlyphKey<'a> {
    fn new(glyph: &'a Glyph) -> Self {
        GlyphKey {
            width: glyph.width(),
            height: glyph.height(),
            bitmap: glyph.bitmap().as_bytes(),
        }
    }
}

impl CharDefs {
    /// Build the glyph records for every glyph of `font` that `ranges` includes.
    pub fn build(font: &Font, ranges: &CharacterRangeSet) -> Result<Self, WriteError> {
        let mut defs = CharDefs::default();
        let mut written: HashMap<GlyphKey, u32> = HashMap::new();

        for glyph in font.glyphs() {
            let code_point = glyph.code_point();
            if !ranges.includes(code_point) {
                continue;
            }
            defs.max_width = defs.max_width.max(glyph.width());
            defs.max_height = defs.max_height.max(glyph.height());

            let offset = match written.entry(GlyphKey::new(glyph)) {
                Entry::Occupied(entry) => {
                    log::debug!("duplicate glyph for character U+{code_point:04X}");
                    *entry.get()
                }
                Entry::Vacant(entry) => {
                    let offset = u32::try_from(defs.data.len())
                        .map_err(|_| WriteError::OffsetOverflow(defs.data.len() as u64))?;
                    defs.push_record(glyph);
                    *entry.insert(offset)
                }
            };
            defs.index.insert(code_point, offset);
        }
        Ok(defs)
    }

    fn push_record(&mut self, glyph: &Glyph) {
        self.data.extend_from_slice(&glyph.width().to_be_bytes());
        self.data.extend_from_slice(&glyph.height().to_be_bytes());
        self.data.extend_from_slice(&glyph.x_offset().to_be_bytes());
        self.data.extend_from_slice(&glyph.y_offset().to_be_bytes());
        self.data.extend_from_slice(&glyph.device_width().to_be_bytes());
        self.data.extend_from_slice(glyph.bitmap().as_bytes());
        self.unique_count += 1;
    }

    /// The concatenated glyph records.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// `(code point, record offset)` pairs in ascending code point order.
    ///
    /// Offsets are relative to the start of [`CharDefs::data`].
    pub fn index(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.index.iter().map(|(code_point, offset)| (*code_point, *offset))
    }

    /// The record offset for `code_point`, if it was included.
    pub fn offset(&self, code_point: u32) -> Option<u32> {
        self.index.get(&code_point).copied()
    }

    /// The number of included code points.
    pub fn index_len(&self) -> usize {
        self.index.len()
    }

    /// The number of distinct records in [`CharDefs::data`].
    pub fn unique_count(&self) -> usize {
        self.unique_count
    }

    /// The widest included glyph.
    pub fn max_width(&self) -> u16 {
        self.max_width
    }

    /// The tallest included glyph.
    pub fn max_height(&self) -> u16 {
        self.max_height
    }
}
