use std::io::{self, Seek, SeekFrom, Write};

use pff2_types::{Tag, UNBOUNDED_SECTION_LEN};

use crate::WriteError;

/// An object that writes a sequence of tagged sections to a seekable sink.
///
/// Every section is a four-byte tag, a big-endian `u32` payload length, and
/// the payload. Sections with a payload known up front are written in one
/// call. A section whose length is only known once its payload is written
/// is opened with [`begin_section`], filled with [`write_all`], and closed
/// with [`end_section`], which seeks back and patches the length.
///
/// Only one section may be open at a time. Opening a second section, writing
/// a complete section while one is open, or closing a section that is not
/// the open one is a programming error, and panics.
///
/// [`begin_section`]: SectionWriter::begin_section
/// [`write_all`]: SectionWriter::write_all
/// [`end_section`]: SectionWriter::end_section
#[derive(Debug)]
pub struct SectionWriter<W> {
    inner: W,
    open: Option<OpenSection>,
}

#[derive(Clone, Copy, Debug)]
struct OpenSection {
    tag: Tag,
    /// position of the first payload byte
    payload_start: u64,
}

impl<W: Write + Seek> SectionWriter<W> {
    pub fn new(inner: W) -> Self {
        SectionWriter { inner, open: None }
    }

    /// Write a complete section.
    pub fn write_section(&mut self, tag: Tag, payload: &[u8]) -> Result<(), WriteError> {
        self.assert_no_open_section(tag);
        let len = section_len(tag, payload.len() as u64)?;
        self.write_header(tag, len)?;
        self.inner.write_all(payload)?;
        Ok(())
    }

    /// Write a string section.
    ///
    /// The string is stored as ISO-8859-1 with no terminator; characters
    /// outside that range are written as `?`.
    pub fn write_str_section(&mut self, tag: Tag, value: &str) -> Result<(), WriteError> {
        self.write_section(tag, &encode_latin1(value))
    }

    pub fn write_u16_section(&mut self, tag: Tag, value: u16) -> Result<(), WriteError> {
        self.write_section(tag, &value.to_be_bytes())
    }

    pub fn write_i16_section(&mut self, tag: Tag, value: i16) -> Result<(), WriteError> {
        self.write_section(tag, &value.to_be_bytes())
    }

    /// Open a section whose length will be filled in by [`end_section`].
    ///
    /// Returns the stream position of the first payload byte.
    ///
    /// [`end_section`]: SectionWriter::end_section
    pub fn begin_section(&mut self, tag: Tag) -> Result<u64, WriteError> {
        self.assert_no_open_section(tag);
        self.write_header(tag, UNBOUNDED_SECTION_LEN)?;
        let payload_start = self.inner.stream_position()?;
        self.open = Some(OpenSection { tag, payload_start });
        Ok(payload_start)
    }

    /// Append payload bytes to the open section.
    ///
    /// # Panics
    ///
    /// If no section is open.
    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), WriteError> {
        assert!(
            self.open.is_some(),
            "attempt to write section payload when no section is active"
        );
        self.inner.write_all(bytes)?;
        Ok(())
    }

    /// Close the open section, patching its length field.
    ///
    /// Returns the payload length. The stream is left positioned at the end
    /// of the section.
    ///
    /// # Panics
    ///
    /// If no section is open, or the open section has a different tag.
    pub fn end_section(&mut self, tag: Tag) -> Result<u32, WriteError> {
        let open = match self.open {
            None => panic!("attempt to end section '{tag}' when no section is active"),
            Some(open) if open.tag != tag => panic!(
                "attempt to end section '{tag}' when active section is '{}'",
                open.tag
            ),
            Some(open) => open,
        };
        let end = self.inner.stream_position()?;
        // the length field is the last four bytes of the header
        let (Some(payload_len), Some(len_pos)) = (
            end.checked_sub(open.payload_start),
            open.payload_start.checked_sub(4),
        ) else {
            return Err(io::Error::other("output does not track its stream position").into());
        };
        let len = section_len(tag, payload_len)?;
        self.inner.seek(SeekFrom::Start(len_pos))?;
        self.inner.write_all(&len.to_be_bytes())?;
        self.inner.seek(SeekFrom::Start(end))?;
        self.open = None;
        Ok(len)
    }

    /// Write the final section, whose payload runs to the end of the stream.
    ///
    /// Its length field holds [`UNBOUNDED_SECTION_LEN`].
    pub fn write_remainder(&mut self, tag: Tag, payload: &[u8]) -> Result<(), WriteError> {
        self.assert_no_open_section(tag);
        self.write_header(tag, UNBOUNDED_SECTION_LEN)?;
        self.inner.write_all(payload)?;
        Ok(())
    }

    /// The current stream position.
    pub fn position(&mut self) -> Result<u64, WriteError> {
        Ok(self.inner.stream_position()?)
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Finish writing and return the sink.
    ///
    /// # Panics
    ///
    /// If a section is still open.
    pub fn into_inner(self) -> W {
        if let Some(open) = self.open {
            panic!("section '{}' was never ended", open.tag);
        }
        self.inner
    }

    fn write_header(&mut self, tag: Tag, len: u32) -> Result<(), WriteError> {
        self.inner.write_all(&tag.to_be_bytes())?;
        self.inner.write_all(&len.to_be_bytes())?;
        Ok(())
    }

    fn assert_no_open_section(&self, tag: Tag) {
        if let Some(open) = self.open {
            panic!(
                "attempt to write section '{tag}' while section '{}' is active",
                open.tag
            );
        }
    }
}

/// Encode as ISO-8859-1, replacing unrepresentable characters with `?`.
pub(crate) fn encode_latin1(value: &str) -> Vec<u8> {
    value
        .chars()
        .map(|c| u8::try_from(c).unwrap_or(b'?'))
        .collect()
}

// the all-ones length is reserved for the unbounded final section
fn section_len(tag: Tag, len: u64) -> Result<u32, WriteError> {
    u32::try_from(len)
        .ok()
        .filter(|len| *len != UNBOUNDED_SECTION_LEN)
        .ok_or(WriteError::SectionTooLarge { tag, len })
}
