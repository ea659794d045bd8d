//! Writing a parsed font as a PFF2 container

use std::{
    fs::{self, File},
    io::{self, BufWriter, Cursor, Seek, Write},
    path::Path,
};

use pff2_types::{sections, storage_flags, CHAR_INDEX_ENTRY_LEN, FILE_MAGIC, SECTION_HEADER_LEN};
use read_bdf::Font;

use crate::{
    char_defs::CharDefs, ranges::CharacterRangeSet, write::SectionWriter, Error, WriteError,
};

/// Write `font` to `sink`, keeping only the glyphs included by `ranges`.
///
/// The sections are written in a fixed order: file magic, the font name,
/// family, weight, slant and (if known) point size, the maximum glyph
/// dimensions, ascent and descent, the character index, and finally the
/// glyph data, which runs to the end of the stream.
pub fn write_font<W: Write + Seek>(
    font: &Font,
    ranges: &CharacterRangeSet,
    sink: W,
) -> Result<W, WriteError> {
    let char_defs = CharDefs::build(font, ranges)?;
    let info = font.info();
    let mut writer = SectionWriter::new(sink);

    writer.write_section(sections::FILE, FILE_MAGIC)?;
    writer.write_str_section(sections::FONT_NAME, &info.standard_name())?;
    writer.write_str_section(sections::FONT_FAMILY, &info.family)?;
    writer.write_str_section(sections::FONT_WEIGHT, info.weight_name())?;
    writer.write_str_section(sections::FONT_SLANT, info.slant_name())?;
    if let Some(point_size) = info.point_size {
        writer.write_u16_section(sections::FONT_POINT_SIZE, point_size)?;
    }
    writer.write_u16_section(sections::MAX_CHAR_WIDTH, char_defs.max_width())?;
    writer.write_u16_section(sections::MAX_CHAR_HEIGHT, char_defs.max_height())?;
    writer.write_i16_section(sections::FONT_ASCENT, info.ascent)?;
    writer.write_i16_section(sections::FONT_DESCENT, info.descent)?;
    write_char_index(&mut writer, &char_defs)?;
    writer.write_remainder(sections::REMAINDER_IS_DATA, char_defs.data())?;

    log::info!(
        "wrote {} characters ({} unique glyphs) for '{}'",
        char_defs.index_len(),
        char_defs.unique_count(),
        info.standard_name(),
    );
    Ok(writer.into_inner())
}

/// Write the character index.
///
/// Each entry points at a glyph record inside the data section that follows
/// the index, so the index length is computed before it is written and
/// checked once it is done.
fn write_char_index<W: Write + Seek>(
    writer: &mut SectionWriter<W>,
    char_defs: &CharDefs,
) -> Result<(), WriteError> {
    let index_start = writer.begin_section(sections::CHAR_INDEX)?;
    let calculated = char_defs.index_len() as u64 * u64::from(CHAR_INDEX_ENTRY_LEN);
    let data_start = index_start + calculated + u64::from(SECTION_HEADER_LEN);

    for (code_point, offset) in char_defs.index() {
        let position = data_start + u64::from(offset);
        let position = u32::try_from(position).map_err(|_| WriteError::OffsetOverflow(position))?;
        writer.write_all(&code_point.to_be_bytes())?;
        writer.write_all(&[storage_flags::UNCOMPRESSED])?;
        writer.write_all(&position.to_be_bytes())?;
    }

    let actual = writer.position()? - index_start;
    if actual != calculated {
        return Err(WriteError::IndexLengthMismatch { calculated, actual });
    }
    writer.end_section(sections::CHAR_INDEX)?;
    Ok(())
}

/// Write `font` to a new byte vector.
pub fn font_to_vec(font: &Font, ranges: &CharacterRangeSet) -> Result<Vec<u8>, WriteError> {
    write_font(font, ranges, Cursor::new(Vec::new())).map(Cursor::into_inner)
}

/// Parse BDF source text and write it to `sink`.
pub fn transcode<W: Write + Seek>(
    bdf_text: &str,
    ranges: &CharacterRangeSet,
    sink: W,
) -> Result<W, Error> {
    let font = read_bdf::parse(bdf_text)?;
    Ok(write_font(&font, ranges, sink)?)
}

/// Convert the BDF file at `input` into a PFF2 file at `output`.
///
/// The input is read as ISO-8859-1 text and fully parsed before anything is
/// written. See [`write_to_path`] for how the output is replaced.
pub fn convert_file(input: &Path, output: &Path, ranges: &CharacterRangeSet) -> Result<(), Error> {
    let data = fs::read(input).map_err(|source| Error::ReadInput {
        path: input.to_owned(),
        source,
    })?;
    if !read_bdf::is_bdf(&data) {
        return Err(Error::NotBdf(input.to_owned()));
    }
    let font = Font::from_bytes(&data)?;
    log::info!(
        "read {} glyphs from '{}'",
        font.num_glyphs(),
        input.display()
    );

    write_to_path(output, |sink| write_font(&font, ranges, sink))?;
    log::info!("wrote '{}'", output.display());
    Ok(())
}

/// Run `write` against a buffered file for `output`.
///
/// When `output` is missing or is a regular file, the data goes to a
/// temporary file in the same directory that replaces `output` only once it
/// is complete, so a failure leaves `output` untouched. Any other kind of
/// path (a symlink, a device, a pipe) is opened and written in place, and is
/// never removed or replaced.
fn write_to_path<F>(output: &Path, write: F) -> Result<(), Error>
where
    F: FnOnce(BufWriter<File>) -> Result<BufWriter<File>, WriteError>,
{
    let create_err = |source| Error::CreateOutput {
        path: output.to_owned(),
        source,
    };
    let replaceable = match fs::symlink_metadata(output) {
        Ok(meta) => meta.file_type().is_file(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => true,
        Err(e) => return Err(create_err(e)),
    };

    if !replaceable {
        log::debug!("'{}' is not a regular file; writing in place", output.display());
        let file = File::create(output).map_err(create_err)?;
        finish(write(BufWriter::new(file)))?;
        return Ok(());
    }

    let dir = output
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let (file, temp_path) = tempfile::Builder::new()
        .prefix(".bdf2pff2-")
        .tempfile_in(dir)
        .map_err(create_err)?
        .into_parts();
    // dropping `temp_path` on the error path deletes the temporary file
    finish(write(BufWriter::new(file)))?;
    temp_path
        .persist(output)
        .map_err(|persist_err| create_err(persist_err.error))?;
    Ok(())
}

fn finish(written: Result<BufWriter<File>, WriteError>) -> Result<(), WriteError> {
    written?
        .into_inner()
        .map_err(io::IntoInnerError::into_error)?
        .sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pff2_types::{Tag, UNBOUNDED_SECTION_LEN};
    use pretty_assertions::assert_eq;
    use read_bdf::{Bitmap, FontInfo, FormatError, Glyph};

    use super::*;

    /// Split a container into its sections, checking every length field.
    fn split_sections(bytes: &[u8]) -> Vec<(Tag, &[u8])> {
        let mut result = Vec::new();
        let mut rest = bytes;
        while !rest.is_empty() {
            let (header, tail) = rest.split_at(8);
            let tag = Tag::new_checked(&header[..4]).unwrap();
            let len = u32::from_be_bytes(header[4..].try_into().unwrap());
            if len == UNBOUNDED_SECTION_LEN {
                result.push((tag, tail));
                break;
            }
            let (payload, tail) = tail.split_at(len as usize);
            result.push((tag, payload));
            rest = tail;
        }
        result
    }

    fn tags(bytes: &[u8]) -> Vec<String> {
        split_sections(bytes)
            .into_iter()
            .map(|(tag, _)| tag.to_string())
            .collect()
    }

    #[test]
    fn sample_layout() {
        let font = read_bdf::parse(bdf_test_data::SAMPLE).unwrap();
        let bytes = font_to_vec(&font, &CharacterRangeSet::new()).unwrap();

        let mut expected: Vec<u8> = Vec::new();
        expected.extend(b"FILE\0\0\0\x04PFF2");
        expected.extend(b"NAME\0\0\0\x0ESample Bold 16");
        expected.extend(b"FAMI\0\0\0\x06Sample");
        expected.extend(b"WEIG\0\0\0\x04bold");
        expected.extend(b"SLAN\0\0\0\x06normal");
        expected.extend(b"PTSZ\0\0\0\x02\0\x10");
        expected.extend(b"MAXW\0\0\0\x02\0\x08");
        expected.extend(b"MAXH\0\0\0\x02\0\x04");
        expected.extend(b"ASCE\0\0\0\x02\0\x04");
        expected.extend(b"DESC\0\0\0\x02\0\0");
        expected.extend(b"CHIX\0\0\0\x24");
        expected.extend(b"\0\0\0\x30\0\0\0\0\xB0");
        expected.extend(b"\0\0\0\x41\0\0\0\0\xBE");
        expected.extend(b"\0\0\0\x5A\0\0\0\0\xCC");
        expected.extend(b"\0\0\x03\x91\0\0\0\0\xBE");
        expected.extend(b"DATA\xFF\xFF\xFF\xFF");
        expected.extend(bdf_test_data::sample::GLYPH_RECORDS);

        assert_eq!(bytes, expected);
    }

    #[test]
    fn index_entries_point_at_records() {
        let font = read_bdf::parse(bdf_test_data::ALPHANUMERIC).unwrap();
        let bytes = font_to_vec(&font, &CharacterRangeSet::new()).unwrap();
        let sections = split_sections(&bytes);
        let (_, index) = sections
            .iter()
            .find(|(tag, _)| *tag == sections::CHAR_INDEX)
            .unwrap();
        assert_eq!(index.len(), 4 * CHAR_INDEX_ENTRY_LEN as usize);

        for entry in index.chunks(CHAR_INDEX_ENTRY_LEN as usize) {
            let code_point = u32::from_be_bytes(entry[..4].try_into().unwrap());
            assert_eq!(entry[4], storage_flags::UNCOMPRESSED);
            let position = u32::from_be_bytes(entry[5..].try_into().unwrap()) as usize;
            let glyph = font.glyph(code_point).unwrap();
            let record = &bytes[position..];
            assert_eq!(&record[..2], glyph.width().to_be_bytes());
            assert_eq!(&record[2..4], glyph.height().to_be_bytes());
            let bitmap = glyph.bitmap().as_bytes();
            assert_eq!(&record[10..10 + bitmap.len()], bitmap);
        }
    }

    #[test]
    fn italic_without_point_size() {
        let font = read_bdf::parse(bdf_test_data::ALPHANUMERIC).unwrap();
        let bytes = font_to_vec(&font, &CharacterRangeSet::new()).unwrap();
        assert_eq!(
            tags(&bytes),
            ["FILE", "NAME", "FAMI", "WEIG", "SLAN", "MAXW", "MAXH", "ASCE", "DESC", "CHIX", "DATA"]
        );
        let sections = split_sections(&bytes);
        assert_eq!(sections[1].1, b"Alnum Italic");
        assert_eq!(sections[3].1, b"normal");
        assert_eq!(sections[4].1, b"italic");
        assert_eq!(sections[8].1, [0, 1]);
    }

    #[test]
    fn filtered_font() {
        let font = read_bdf::parse(bdf_test_data::ALPHANUMERIC).unwrap();
        let ranges: CharacterRangeSet = [0x7A..=0x7A].into_iter().collect();
        let bytes = font_to_vec(&font, &ranges).unwrap();
        let sections = split_sections(&bytes);
        assert_eq!(sections[5], (sections::MAX_CHAR_WIDTH, &[0u8, 4][..]));
        assert_eq!(sections[6], (sections::MAX_CHAR_HEIGHT, &[0u8, 4][..]));
        let (tag, index) = sections[9];
        assert_eq!(tag, sections::CHAR_INDEX);
        assert_eq!(&index[..4], 0x7Au32.to_be_bytes());
        assert_eq!(index.len(), CHAR_INDEX_ENTRY_LEN as usize);
        // one 4x4 glyph: header plus four bitmap bytes
        assert_eq!(sections[10].1.len(), 14);
    }

    #[test]
    fn empty_font() {
        let font = Font::new(FontInfo::new(10, 2), []);
        let bytes = font_to_vec(&font, &CharacterRangeSet::new()).unwrap();
        let sections = split_sections(&bytes);
        assert_eq!(sections[1].1, b"Unknown");
        let (tag, index) = sections[sections.len() - 2];
        assert_eq!(tag, sections::CHAR_INDEX);
        assert!(index.is_empty());
        let (tag, data) = sections[sections.len() - 1];
        assert_eq!(tag, sections::REMAINDER_IS_DATA);
        assert!(data.is_empty());
    }

    #[test]
    fn negative_metrics() {
        let bitmap = Bitmap::from_bytes(1, 1, vec![0x80]).unwrap();
        let mut info = FontInfo::new(-3, -4);
        info.family = "Neg".into();
        let font = Font::new(info, [Glyph::new(0x2E, -2, -5, 2, bitmap)]);
        let bytes = font_to_vec(&font, &CharacterRangeSet::new()).unwrap();
        let sections = split_sections(&bytes);
        assert_eq!(sections[7].1, (-3i16).to_be_bytes());
        assert_eq!(sections[8].1, (-4i16).to_be_bytes());
        assert_eq!(
            sections[10].1,
            [0, 1, 0, 1, 0xFF, 0xFE, 0xFF, 0xFB, 0, 2, 0x80]
        );
    }

    #[test]
    fn transcode_text() {
        let sink = transcode(
            bdf_test_data::SAMPLE,
            &CharacterRangeSet::new(),
            Cursor::new(Vec::new()),
        )
        .unwrap();
        let font = read_bdf::parse(bdf_test_data::SAMPLE).unwrap();
        assert_eq!(
            sink.into_inner(),
            font_to_vec(&font, &CharacterRangeSet::new()).unwrap()
        );
    }

    #[test]
    fn transcode_bad_text() {
        let err = transcode(
            bdf_test_data::MISSING_ASCENT,
            &CharacterRangeSet::new(),
            Cursor::new(Vec::new()),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::MissingProperty("FONT_ASCENT"))
        ));
    }

    #[test]
    fn convert_sample_file() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sample.bdf");
        let output = dir.path().join("sample.pf2");
        fs::write(&input, bdf_test_data::SAMPLE).unwrap();

        convert_file(&input, &output, &CharacterRangeSet::new()).unwrap();
        let written = fs::read(&output).unwrap();
        let font = read_bdf::parse(bdf_test_data::SAMPLE).unwrap();
        assert_eq!(written, font_to_vec(&font, &CharacterRangeSet::new()).unwrap());
    }

    #[test]
    fn convert_rejects_non_bdf() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("not_a_font.txt");
        let output = dir.path().join("out.pf2");
        fs::write(&input, "hello").unwrap();

        let err = convert_file(&input, &output, &CharacterRangeSet::new()).unwrap_err();
        assert!(matches!(err, Error::NotBdf(path) if path == input));
        assert!(!output.exists());
    }

    #[test]
    fn convert_bad_font_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.bdf");
        let output = dir.path().join("broken.pf2");
        fs::write(&input, bdf_test_data::MISSING_ASCENT).unwrap();

        let err = convert_file(&input, &output, &CharacterRangeSet::new()).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
        assert!(!output.exists());
    }

    #[test]
    fn convert_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.bdf");
        let output = dir.path().join("missing.pf2");
        let err = convert_file(&input, &output, &CharacterRangeSet::new()).unwrap_err();
        assert!(matches!(err, Error::ReadInput { .. }));
        assert!(err.to_string().contains("missing.bdf"));
    }

    fn fail_after_partial_write(mut sink: BufWriter<File>) -> Result<BufWriter<File>, WriteError> {
        sink.write_all(b"FILE\0\0\0\x04PF")?;
        Err(io::Error::other("no space left on device").into())
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn failed_write_keeps_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("font.pf2");
        fs::write(&output, b"previous font").unwrap();

        let err = write_to_path(&output, fail_after_partial_write).unwrap_err();
        assert!(matches!(err, Error::Write(WriteError::Io(_))));
        assert_eq!(fs::read(&output).unwrap(), b"previous font");
        assert_eq!(dir_entries(dir.path()), ["font.pf2"]);
    }

    #[test]
    fn failed_write_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("font.pf2");
        assert!(write_to_path(&output, fail_after_partial_write).is_err());
        assert!(dir_entries(dir.path()).is_empty());
    }

    #[test]
    fn successful_write_replaces_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sample.bdf");
        let output = dir.path().join("sample.pf2");
        fs::write(&input, bdf_test_data::SAMPLE).unwrap();
        fs::write(&output, b"previous font").unwrap();

        convert_file(&input, &output, &CharacterRangeSet::new()).unwrap();
        assert!(fs::read(&output).unwrap().starts_with(b"FILE\0\0\0\x04PFF2"));
        assert_eq!(dir_entries(dir.path()), ["sample.bdf", "sample.pf2"]);
    }

    #[cfg(unix)]
    #[test]
    fn failed_write_keeps_symlinked_output() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target.pf2");
        let link = dir.path().join("link.pf2");
        fs::write(&target, b"").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(write_to_path(&link, fail_after_partial_write).is_err());
        let meta = fs::symlink_metadata(&link).unwrap();
        assert!(meta.file_type().is_symlink());
        assert!(target.exists());
    }

    #[cfg(unix)]
    #[test]
    fn null_device_output_is_not_removed() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sample.bdf");
        let link = dir.path().join("null.pf2");
        fs::write(&input, bdf_test_data::SAMPLE).unwrap();
        std::os::unix::fs::symlink("/dev/null", &link).unwrap();

        // /dev/null cannot hold a seekable container, so the index check fails
        assert!(convert_file(&input, &link, &CharacterRangeSet::new()).is_err());
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert!(Path::new("/dev/null").exists());
    }
}
