use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

/// The name of a section in a PFF2 container.
///
/// A section tag is exactly four bytes, each in the printable, non-space
/// ASCII range `(0x21..=0x7E)`. Unlike OpenType tags, short tags are never
/// padded: the renderer compares all four bytes.
///
/// Known tags are available as constants in [`crate::sections`]; use
/// [`Tag::new_checked`] when a tag comes from user input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Construct a `Tag` from raw bytes.
    ///
    /// This does not perform any validation; use [`Tag::new_checked`] for a
    /// constructor that validates input.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// Attempt to create a `Tag` from raw bytes.
    ///
    /// The slice must contain exactly 4 bytes, each in the printable
    /// non-space ascii range (`0x21..=0x7E`).
    pub const fn new_checked(src: &[u8]) -> Result<Self, InvalidTag> {
        if src.len() != 4 {
            return Err(InvalidTag::InvalidLength(src.len()));
        }
        let mut raw = [0; 4];
        let mut i = 0;
        while i < 4 {
            let byte = src[i];
            if byte < 0x21 || byte > 0x7E {
                return Err(InvalidTag::InvalidByte { pos: i, byte });
            }
            raw[i] = byte;
            i += 1;
        }
        Ok(Tag(raw))
    }

    /// Return the bytes of this tag, in the order they are written.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }

    /// Check that the tag contains only bytes a PFF2 reader accepts.
    pub fn validate(self) -> Result<(), InvalidTag> {
        Tag::new_checked(&self.0).map(|_| ())
    }
}

/// An error representing an invalid tag.
///
/// This is returned as an error from [`Tag::new_checked`] and
/// [`Tag::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidTag {
    /// The tag was not exactly 4 bytes in length.
    InvalidLength(usize),
    /// The tag contained a byte outside of `(0x21..=0x7E)`.
    InvalidByte { pos: usize, byte: u8 },
}

impl FromStr for Tag {
    type Err = InvalidTag;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Tag::new_checked(src.as_bytes())
    }
}

impl std::error::Error for InvalidTag {}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            if (0x20..=0x7E).contains(&byte) {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "{{0x{byte:02X}}}")?;
            }
        }
        Ok(())
    }
}

impl Display for InvalidTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidTag::InvalidByte { pos, byte } => {
                write!(f, "Invalid byte 0x{byte:X} at index {pos}")
            }
            InvalidTag::InvalidLength(len) => {
                write!(f, "Invalid length ({len}), section tags are 4 bytes")
            }
        }
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({self})")
    }
}

// tags are strings in human-readable formats and raw bytes otherwise.
#[cfg(feature = "serde")]
impl serde::Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            std::str::from_utf8(&self.0)
                .map_err(serde::ser::Error::custom)?
                .serialize(serializer)
        } else {
            self.0.serialize(serializer)
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct TagStrVisitor;
        impl serde::de::Visitor<'_> for TagStrVisitor {
            type Value = Tag;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "a four-byte ascii string")
            }
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }
        }
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(TagStrVisitor)
        } else {
            <[u8; 4]>::deserialize(deserializer).map(|raw| Tag::new(&raw))
        }
    }
}
