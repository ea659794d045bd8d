//! Glyph bitmaps and metrics

/// A 1-bit-per-pixel raster.
///
/// Pixels are stored row-major with no padding between rows, so a row may
/// start in the middle of a byte. Within a byte the most significant bit is
/// the leftmost (or uppermost) pixel. Bits past `width * height` in the last
/// byte are always clear.
///
/// Two bitmaps compare equal when their dimensions and bytes are equal; this
/// is the notion of "same shape" used when deduplicating glyphs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawBitmap"))]
pub struct Bitmap {
    width: u16,
    height: u16,
    data: Vec<u8>,
}

/// The unchecked serialized form of a [`Bitmap`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawBitmap {
    width: u16,
    height: u16,
    data: Vec<u8>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawBitmap> for Bitmap {
    type Error = BitmapSizeError;

    fn try_from(raw: RawBitmap) -> Result<Self, Self::Error> {
        Bitmap::from_bytes(raw.width, raw.height, raw.data)
    }
}

/// The packed data passed to [`Bitmap::from_bytes`] had the wrong length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("bitmap of {width}x{height} pixels needs {expected} bytes, got {actual}")]
pub struct BitmapSizeError {
    pub width: u16,
    pub height: u16,
    pub expected: usize,
    pub actual: usize,
}

/// A character in a bitmap row was not a hexadecimal digit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex digit {0:?}")]
pub struct InvalidHexDigit(pub char);

impl Bitmap {
    /// Create a bitmap with every pixel clear.
    pub fn new(width: u16, height: u16) -> Self {
        Bitmap {
            width,
            height,
            data: vec![0; Self::byte_len(width, height)],
        }
    }

    /// Create a bitmap from already packed data.
    ///
    /// `data` must be exactly [`Bitmap::byte_len`] bytes long.
    pub fn from_bytes(width: u16, height: u16, data: Vec<u8>) -> Result<Self, BitmapSizeError> {
        let expected = Self::byte_len(width, height);
        if data.len() != expected {
            return Err(BitmapSizeError {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Bitmap {
            width,
            height,
            data,
        })
    }

    /// The number of bytes needed to pack `width * height` pixels.
    pub fn byte_len(width: u16, height: u16) -> usize {
        (width as usize * height as usize).div_ceil(8)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// The packed pixel data.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the pixel at `(x, y)`, or `None` if it is outside the bitmap.
    pub fn pixel(&self, x: u16, y: u16) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let (byte, mask) = self.locate(x, y);
        Some(self.data[byte] & mask != 0)
    }

    /// Set or clear the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the location is outside the bitmap.
    pub fn set_pixel(&mut self, x: u16, y: u16, value: bool) {
        assert!(
            x < self.width && y < self.height,
            "invalid pixel location ({x}, {y}) for {}x{} bitmap",
            self.width,
            self.height
        );
        let (byte, mask) = self.locate(x, y);
        if value {
            self.data[byte] |= mask;
        } else {
            self.data[byte] &= !mask;
        }
    }

    /// Fill row `y` from a BDF hex string.
    ///
    /// Each digit supplies four pixels, most significant bit first. Pixels
    /// past the bitmap width (the padding in the last digit, or any extra
    /// digits) are ignored, but every character must still be a hex digit.
    /// A short row leaves the remaining pixels clear.
    ///
    /// # Panics
    ///
    /// Panics if `y` is not a valid row.
    pub fn set_row_from_hex(&mut self, y: u16, hex: &str) -> Result<(), InvalidHexDigit> {
        for (i, c) in hex.chars().enumerate() {
            let nibble = c.to_digit(16).ok_or(InvalidHexDigit(c))?;
            for bit in 0..4 {
                let x = i * 4 + bit;
                if x >= self.width as usize {
                    break;
                }
                self.set_pixel(x as u16, y, nibble & (0x8 >> bit) != 0);
            }
        }
        Ok(())
    }

    fn locate(&self, x: u16, y: u16) -> (usize, u8) {
        let bit_index = y as usize * self.width as usize + x as usize;
        (bit_index / 8, 0x80 >> (bit_index % 8))
    }
}

/// The bitmap and metrics for one code point.
///
/// Glyphs are immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glyph {
    code_point: u32,
    // These define the amounts to shift the bitmap by before drawing it,
    // see the BBX entry in the BDF specification.
    x_offset: i16,
    y_offset: i16,
    // Number of pixels to advance horizontally from this glyph's origin
    // to the origin of the next one.
    device_width: i16,
    bitmap: Bitmap,
}

impl Glyph {
    pub fn new(
        code_point: u32,
        x_offset: i16,
        y_offset: i16,
        device_width: i16,
        bitmap: Bitmap,
    ) -> Self {
        Glyph {
            code_point,
            x_offset,
            y_offset,
            device_width,
            bitmap,
        }
    }

    pub fn code_point(&self) -> u32 {
        self.code_point
    }

    /// Width of the bounding box in pixels.
    pub fn width(&self) -> u16 {
        self.bitmap.width
    }

    /// Height of the bounding box in pixels.
    pub fn height(&self) -> u16 {
        self.bitmap.height
    }

    /// Horizontal displacement of the bounding box from the origin.
    pub fn x_offset(&self) -> i16 {
        self.x_offset
    }

    /// Vertical displacement of the bounding box from the baseline.
    pub fn y_offset(&self) -> i16 {
        self.y_offset
    }

    /// Horizontal advance after drawing this glyph.
    pub fn device_width(&self) -> i16 {
        self.device_width
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}
