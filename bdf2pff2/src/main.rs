//! BDF to PFF2 font converter
//!
//! Reads a BDF bitmap font and writes a PFF2 font file, optionally keeping
//! only the glyphs in the given code point ranges.
//!
//! ```text
//! bdf2pff2 --in=unifont.bdf --out=unifont.pf2 0x0-0x7F 0x2500-0x257F
//! ```
//!
//! Set `RUST_LOG=info` to see a summary of the conversion.

use std::path::PathBuf;

use clap::Parser;
use write_pff2::{CharacterRange, CharacterRangeSet};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The input BDF font file.
    #[arg(long = "in", value_name = "FILE")]
    input: PathBuf,

    /// The output PFF2 font file.
    #[arg(long = "out", value_name = "FILE")]
    output: PathBuf,

    /// Code points to include, as `0xCODE` or `0xSTART-0xEND`.
    ///
    /// All glyphs are included if no range is given.
    #[arg(value_name = "RANGE", value_parser = parse_range)]
    ranges: Vec<CharacterRange>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
enum RangeError {
    #[error("'{0}' must be a single code point or two joined by '-'")]
    TooManyParts(String),
    #[error("'{0}' must start with '0x'")]
    MissingPrefix(String),
    #[error("'{0}' is not a hexadecimal number")]
    InvalidHex(String),
    #[error("range start 0x{start:X} is greater than end 0x{end:X}")]
    Reversed { start: u32, end: u32 },
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let ranges: CharacterRangeSet = args.ranges.into_iter().collect();
    if let Err(e) = write_pff2::convert_file(&args.input, &args.output, &ranges) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn parse_range(arg: &str) -> Result<CharacterRange, RangeError> {
    let (start, end) = match arg.split_once('-') {
        Some((_, end)) if end.contains('-') => {
            return Err(RangeError::TooManyParts(arg.to_owned()))
        }
        Some((start, end)) => (parse_code_point(start)?, parse_code_point(end)?),
        None => {
            let code_point = parse_code_point(arg)?;
            (code_point, code_point)
        }
    };
    if start > end {
        return Err(RangeError::Reversed { start, end });
    }
    Ok(CharacterRange::new(start, end))
}

fn parse_code_point(raw: &str) -> Result<u32, RangeError> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| RangeError::MissingPrefix(raw.to_owned()))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(RangeError::InvalidHex(raw.to_owned()));
    }
    u32::from_str_radix(digits, 16).map_err(|_| RangeError::InvalidHex(raw.to_owned()))
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, CommandFactory};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[rstest]
    #[case("0x41", 0x41, 0x41)]
    #[case("0x41-0x5A", 0x41, 0x5A)]
    #[case("0x0-0x7f", 0x0, 0x7F)]
    #[case("0x10FFFF", 0x10FFFF, 0x10FFFF)]
    #[case("0x20-0x20", 0x20, 0x20)]
    fn valid_ranges(#[case] arg: &str, #[case] start: u32, #[case] end: u32) {
        assert_eq!(parse_range(arg), Ok(CharacterRange::new(start, end)));
    }

    #[rstest]
    #[case("0x1-0x2-0x3", RangeError::TooManyParts("0x1-0x2-0x3".into()))]
    #[case("41", RangeError::MissingPrefix("41".into()))]
    #[case("0x41-5A", RangeError::MissingPrefix("5A".into()))]
    #[case("0xZZ", RangeError::InvalidHex("0xZZ".into()))]
    #[case("0x", RangeError::InvalidHex("0x".into()))]
    #[case("0x+41", RangeError::InvalidHex("0x+41".into()))]
    #[case("0x100000000", RangeError::InvalidHex("0x100000000".into()))]
    #[case("0x5A-0x41", RangeError::Reversed { start: 0x5A, end: 0x41 })]
    fn invalid_ranges(#[case] arg: &str, #[case] expected: RangeError) {
        assert_eq!(parse_range(arg), Err(expected));
    }

    #[test]
    fn parse_args() {
        let args =
            Args::try_parse_from(["bdf2pff2", "--in=a.bdf", "--out=a.pf2", "0x41-0x5A", "0x30"])
                .unwrap();
        assert_eq!(args.input, PathBuf::from("a.bdf"));
        assert_eq!(args.output, PathBuf::from("a.pf2"));
        assert_eq!(
            args.ranges,
            [CharacterRange::new(0x41, 0x5A), CharacterRange::single(0x30)]
        );
    }

    #[test]
    fn no_ranges() {
        let args = Args::try_parse_from(["bdf2pff2", "--in", "a.bdf", "--out", "a.pf2"]).unwrap();
        assert!(args.ranges.is_empty());
    }

    #[test]
    fn bad_range_is_usage_error() {
        let err = Args::try_parse_from(["bdf2pff2", "--in=a.bdf", "--out=a.pf2", "0x5A-0x41"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_output_is_usage_error() {
        let err = Args::try_parse_from(["bdf2pff2", "--in=a.bdf"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
