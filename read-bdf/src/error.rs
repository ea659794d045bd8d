//! Errors that occur while reading a BDF source

/// The input does not follow the BDF grammar.
///
/// Line numbers start at 1. Code points are reported as written in the
/// `ENCODING` line, which may be negative for unencoded glyphs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum FormatError {
    #[error("BDF format error: end of file while {0}")]
    UnexpectedEof(&'static str),

    #[error("BDF format error: no tokens after {key} on line {line}")]
    MissingValue { line: usize, key: &'static str },

    #[error("BDF format error: invalid number '{token}' for {key} on line {line}")]
    InvalidNumber {
        line: usize,
        key: &'static str,
        token: String,
    },

    #[error("BDF format error: {key} value {value} is out of range on line {line}")]
    ValueOutOfRange {
        line: usize,
        key: &'static str,
        value: i64,
    },

    #[error("BDF format error: line {line} doesn't match string setting pattern: {text}")]
    MalformedString { line: usize, text: String },

    #[error("BDF format error: no {0} property")]
    MissingProperty(&'static str),

    #[error("BDF format error: no character name after STARTCHAR on line {line}")]
    MissingCharName { line: usize },

    #[error("BDF format error: no code point set for character before line {line}")]
    MissingEncoding { line: usize },

    #[error("BDF format error: BBX missing for char {code_point}")]
    MissingBoundingBox { code_point: i64 },

    #[error("BDF format error: DWIDTH missing for char {code_point}")]
    MissingDeviceWidth { code_point: i64 },

    #[error(
        "BDF format error: DWIDTH Y value is nonzero ({value}) for {} on line {line}",
        describe_char(.code_point)
    )]
    NonZeroAdvanceY {
        line: usize,
        code_point: Option<i64>,
        value: i64,
    },

    #[error("BDF format error: invalid hex digit {digit:?} in bitmap of char {code_point} on line {line}")]
    InvalidHexDigit {
        line: usize,
        code_point: i64,
        digit: char,
    },
}

impl FormatError {
    /// The code point of the glyph being read when the error occurred, if known.
    pub fn code_point(&self) -> Option<i64> {
        match self {
            FormatError::MissingBoundingBox { code_point }
            | FormatError::MissingDeviceWidth { code_point }
            | FormatError::InvalidHexDigit { code_point, .. } => Some(*code_point),
            FormatError::NonZeroAdvanceY { code_point, .. } => *code_point,
            _ => None,
        }
    }

    /// The line where the error was detected, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            FormatError::MissingValue { line, .. }
            | FormatError::InvalidNumber { line, .. }
            | FormatError::ValueOutOfRange { line, .. }
            | FormatError::MalformedString { line, .. }
            | FormatError::MissingCharName { line }
            | FormatError::MissingEncoding { line }
            | FormatError::NonZeroAdvanceY { line, .. }
            | FormatError::InvalidHexDigit { line, .. } => Some(*line),
            _ => None,
        }
    }
}

fn describe_char(code_point: &Option<i64>) -> String {
    match code_point {
        Some(code_point) => format!("char {code_point}"),
        None => "char with no ENCODING yet".to_owned(),
    }
}
