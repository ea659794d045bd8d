//! The parsed font: metadata plus a table of glyphs keyed by code point

use std::collections::BTreeMap;

use crate::{glyph::Glyph, FormatError};

/// The family name used when the source does not set `FAMILY_NAME`.
pub const UNKNOWN_FAMILY: &str = "Unknown";

/// Font-level metadata, read from the BDF header.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontInfo {
    pub family: String,
    pub bold: bool,
    pub italic: bool,
    /// Point size, or `None` if the source does not say.
    pub point_size: Option<u16>,
    pub ascent: i16,
    pub descent: i16,
}

impl FontInfo {
    /// Metadata for a regular font of unknown family and size.
    pub fn new(ascent: i16, descent: i16) -> Self {
        FontInfo {
            family: UNKNOWN_FAMILY.to_owned(),
            bold: false,
            italic: false,
            point_size: None,
            ascent,
            descent,
        }
    }

    /// The full name of the font, e.g. `"Fixed Bold Italic 16"`.
    ///
    /// The point size is left off when it is unknown.
    pub fn standard_name(&self) -> String {
        let mut name = self.family.clone();
        if self.bold {
            name.push_str(" Bold");
        }
        if self.italic {
            name.push_str(" Italic");
        }
        if let Some(size) = self.point_size {
            name.push(' ');
            name.push_str(&size.to_string());
        }
        name
    }

    pub fn weight_name(&self) -> &'static str {
        if self.bold {
            "bold"
        } else {
            "normal"
        }
    }

    pub fn slant_name(&self) -> &'static str {
        if self.italic {
            "italic"
        } else {
            "normal"
        }
    }
}

/// A bitmap font.
///
/// A `Font` is read-only: it is finalized when constructed, at which point
/// the maximum glyph dimensions are recorded.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Font {
    info: FontInfo,
    glyphs: BTreeMap<u32, Glyph>,
    max_width: u16,
    max_height: u16,
}

impl Font {
    /// Build a font from metadata and glyphs.
    ///
    /// If more than one glyph has the same code point, the last one wins.
    pub fn new(info: FontInfo, glyphs: impl IntoIterator<Item = Glyph>) -> Self {
        let glyphs: BTreeMap<_, _> = glyphs
            .into_iter()
            .map(|glyph| (glyph.code_point(), glyph))
            .collect();
        let max_width = glyphs.values().map(Glyph::width).max().unwrap_or(0);
        let max_height = glyphs.values().map(Glyph::height).max().unwrap_or(0);
        Font::from_parts(info, glyphs, max_width, max_height)
    }

    pub(crate) fn from_parts(
        info: FontInfo,
        glyphs: BTreeMap<u32, Glyph>,
        max_width: u16,
        max_height: u16,
    ) -> Self {
        Font {
            info,
            glyphs,
            max_width,
            max_height,
        }
    }

    /// Parse a BDF file.
    ///
    /// BDF sources are 8-bit text; the bytes are decoded as ISO-8859-1.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        crate::parse(&crate::decode_latin1(bytes))
    }

    pub fn info(&self) -> &FontInfo {
        &self.info
    }

    pub fn family(&self) -> &str {
        &self.info.family
    }

    pub fn is_bold(&self) -> bool {
        self.info.bold
    }

    pub fn is_italic(&self) -> bool {
        self.info.italic
    }

    pub fn point_size(&self) -> Option<u16> {
        self.info.point_size
    }

    pub fn ascent(&self) -> i16 {
        self.info.ascent
    }

    pub fn descent(&self) -> i16 {
        self.info.descent
    }

    /// The widest glyph bounding box seen while building this font.
    pub fn max_width(&self) -> u16 {
        self.max_width
    }

    /// The tallest glyph bounding box seen while building this font.
    pub fn max_height(&self) -> u16 {
        self.max_height
    }

    pub fn glyph(&self, code_point: u32) -> Option<&Glyph> {
        self.glyphs.get(&code_point)
    }

    /// Iterate over the glyphs in ascending code point order.
    pub fn glyphs(&self) -> impl Iterator<Item = &Glyph> + '_ {
        self.glyphs.values()
    }

    pub fn num_glyphs(&self) -> usize {
        self.glyphs.len()
    }
}
