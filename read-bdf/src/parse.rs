//! A line oriented parser for BDF sources
//!
//! Parsing happens in two phases. The header phase reads font-wide
//! properties up to the `CHARS` line; the character phase then reads one
//! `STARTCHAR` ... `BITMAP` block at a time until the input runs out.

use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;

use crate::{
    font::{Font, FontInfo},
    glyph::{Bitmap, Glyph},
    FormatError,
};

// matches lines like `FAMILY_NAME "Fixed"`
static STRING_SETTING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(\w+)\s+"([^"]+)"$"#).unwrap());

/// Parses BDF text, one line at a time.
///
/// The parser accepts any iterator of lines, so it can be driven from
/// [`str::lines`] or from [`std::io::BufRead::lines`] alike.
pub struct Parser<I> {
    lines: I,
    line_no: usize,
    max_width: u16,
    max_height: u16,
}

/// The result of reading one character block.
enum CharRecord {
    Glyph(Glyph),
    /// A glyph with a negative `ENCODING`: valid BDF, but with no code point.
    Unencoded(i64),
    /// The input ended, either before the next `STARTCHAR` or partway
    /// through a bitmap.
    End,
}

impl<I, S> Parser<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub fn new(lines: I) -> Self {
        Parser {
            lines,
            line_no: 0,
            max_width: 0,
            max_height: 0,
        }
    }

    /// Consume all input, producing a finalized [`Font`].
    pub fn parse(mut self) -> Result<Font, FormatError> {
        let info = self.read_header()?;
        let mut glyphs = BTreeMap::new();
        loop {
            match self.read_char()? {
                CharRecord::Glyph(glyph) => {
                    self.max_width = self.max_width.max(glyph.width());
                    self.max_height = self.max_height.max(glyph.height());
                    if let Some(old) = glyphs.insert(glyph.code_point(), glyph) {
                        log::debug!("replacing earlier glyph for U+{:04X}", old.code_point());
                    }
                }
                CharRecord::Unencoded(encoding) => {
                    log::debug!("skipping unencoded glyph (ENCODING {encoding})");
                }
                CharRecord::End => break,
            }
        }
        log::debug!("read {} glyphs from {} lines", glyphs.len(), self.line_no);
        Ok(Font::from_parts(
            info,
            glyphs,
            self.max_width,
            self.max_height,
        ))
    }

    fn next_line(&mut self) -> Option<S> {
        let line = self.lines.next()?;
        self.line_no += 1;
        Some(line)
    }

    fn read_header(&mut self) -> Result<FontInfo, FormatError> {
        let mut info = FontInfo::new(0, 0);
        let mut ascent = None;
        let mut descent = None;
        loop {
            let Some(line) = self.next_line() else {
                return Err(FormatError::UnexpectedEof(
                    "reading global font information",
                ));
            };
            let line = line.as_ref();
            let mut tokens = line.split_whitespace();
            let Some(key) = tokens.next() else {
                continue;
            };
            match key {
                "FONT_ASCENT" => ascent = Some(self.number("FONT_ASCENT", tokens.next())?),
                "FONT_DESCENT" => descent = Some(self.number("FONT_DESCENT", tokens.next())?),
                "POINT_SIZE" => {
                    // stored as decipoints
                    let size: i64 = self.number("POINT_SIZE", tokens.next())?;
                    info.point_size = Some(self.narrow("POINT_SIZE", size / 10)?);
                }
                "FAMILY_NAME" => info.family = self.string_setting(line)?.to_owned(),
                "WEIGHT_NAME" => {
                    info.bold = self.string_setting(line)?.eq_ignore_ascii_case("bold")
                }
                "SLANT" => info.italic = !self.string_setting(line)?.eq_ignore_ascii_case("R"),
                "CHARS" => break,
                _ => (),
            }
        }
        info.ascent = ascent.ok_or(FormatError::MissingProperty("FONT_ASCENT"))?;
        info.descent = descent.ok_or(FormatError::MissingProperty("FONT_DESCENT"))?;
        Ok(info)
    }

    fn read_char(&mut self) -> Result<CharRecord, FormatError> {
        // find the start of the next character
        loop {
            let Some(line) = self.next_line() else {
                return Ok(CharRecord::End);
            };
            let mut tokens = line.as_ref().split_whitespace();
            if tokens.next() == Some("STARTCHAR") {
                if tokens.next().is_none() {
                    return Err(FormatError::MissingCharName { line: self.line_no });
                }
                break;
            }
        }

        let mut encoding: Option<i64> = None;
        let mut bbx: Option<(u16, u16, i16, i16)> = None;
        let mut device_width: Option<i16> = None;
        loop {
            let Some(line) = self.next_line() else {
                return Err(FormatError::UnexpectedEof("reading character properties"));
            };
            let mut tokens = line.as_ref().split_whitespace();
            match tokens.next() {
                Some("ENCODING") => encoding = Some(self.number("ENCODING", tokens.next())?),
                Some("BBX") => {
                    bbx = Some((
                        self.number("BBX", tokens.next())?,
                        self.number("BBX", tokens.next())?,
                        self.number("BBX", tokens.next())?,
                        self.number("BBX", tokens.next())?,
                    ))
                }
                Some("DWIDTH") => {
                    device_width = Some(self.number("DWIDTH", tokens.next())?);
                    let advance_y: i64 = self.number("DWIDTH", tokens.next())?;
                    if advance_y != 0 {
                        return Err(FormatError::NonZeroAdvanceY {
                            line: self.line_no,
                            code_point: encoding,
                            value: advance_y,
                        });
                    }
                }
                Some("BITMAP") => break,
                _ => (),
            }
        }

        let encoding = encoding.ok_or(FormatError::MissingEncoding { line: self.line_no })?;
        let (width, height, x_offset, y_offset) = bbx.ok_or(FormatError::MissingBoundingBox {
            code_point: encoding,
        })?;
        let device_width = device_width.ok_or(FormatError::MissingDeviceWidth {
            code_point: encoding,
        })?;
        let code_point = if encoding < 0 {
            None
        } else {
            Some(self.narrow::<u32>("ENCODING", encoding)?)
        };

        let mut bitmap = Bitmap::new(width, height);
        for y in 0..height {
            let Some(row) = self.next_line() else {
                log::warn!(
                    "input ended in the bitmap of char {encoding}; keeping the glyphs read so far"
                );
                return Ok(CharRecord::End);
            };
            bitmap
                .set_row_from_hex(y, row.as_ref().trim())
                .map_err(|bad| FormatError::InvalidHexDigit {
                    line: self.line_no,
                    code_point: encoding,
                    digit: bad.0,
                })?;
        }

        Ok(match code_point {
            Some(code_point) => CharRecord::Glyph(Glyph::new(
                code_point,
                x_offset,
                y_offset,
                device_width,
                bitmap,
            )),
            None => CharRecord::Unencoded(encoding),
        })
    }

    /// Parse the value token of `key`, checking that it fits in `T`.
    fn number<T: TryFrom<i64>>(
        &self,
        key: &'static str,
        token: Option<&str>,
    ) -> Result<T, FormatError> {
        let token = token.ok_or(FormatError::MissingValue {
            line: self.line_no,
            key,
        })?;
        let value: i64 = token.parse().map_err(|_| FormatError::InvalidNumber {
            line: self.line_no,
            key,
            token: token.to_owned(),
        })?;
        self.narrow(key, value)
    }

    fn narrow<T: TryFrom<i64>>(&self, key: &'static str, value: i64) -> Result<T, FormatError> {
        T::try_from(value).map_err(|_| FormatError::ValueOutOfRange {
            line: self.line_no,
            key,
            value,
        })
    }

    fn string_setting<'a>(&self, line: &'a str) -> Result<&'a str, FormatError> {
        STRING_SETTING
            .captures(line.trim_end())
            .and_then(|captures| captures.get(2))
            .map(|value| value.as_str())
            .ok_or_else(|| FormatError::MalformedString {
                line: self.line_no,
                text: line.to_owned(),
            })
    }
}
