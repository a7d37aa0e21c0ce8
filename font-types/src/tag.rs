use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

/// A four-byte table identifier, such as `head` or `glyf`.
///
/// Tags found in existing fonts are not required to be printable; any four
/// bytes can be represented. Use [`Tag::new_checked`] to construct a tag from
/// user input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Construct a `Tag` from raw bytes, without validation.
    pub const fn new(src: &[u8; 4]) -> Tag {
        Tag(*src)
    }

    /// Attempt to create a `Tag` from one to four printable ascii bytes.
    ///
    /// Shorter input is padded with spaces. A space may not be the first byte,
    /// and may only be followed by other spaces.
    pub fn new_checked(src: &[u8]) -> Result<Self, InvalidTag> {
        if src.is_empty() || src.len() > 4 {
            return Err(InvalidTag::InvalidLength(src.len()));
        }
        let mut raw = [b' '; 4];
        raw[..src.len()].copy_from_slice(src);
        let tag = Tag(raw);
        tag.validate()?;
        Ok(tag)
    }

    /// Construct a new `Tag` from a big-endian `u32`.
    pub const fn from_u32(src: u32) -> Self {
        Self::from_be_bytes(src.to_be_bytes())
    }

    /// Create a tag from raw big-endian bytes.
    pub const fn from_be_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Return the raw bytes of this tag.
    pub const fn to_be_bytes(self) -> [u8; 4] {
        self.0
    }

    /// Return the tag as a big-endian `u32`.
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Check that the tag contains only printable ascii, with no interior
    /// or leading spaces.
    pub fn validate(self) -> Result<(), InvalidTag> {
        let mut seen_space = false;
        for (pos, byte) in self.0.into_iter().enumerate() {
            match byte {
                b' ' if pos == 0 => return Err(InvalidTag::InvalidByte { pos, byte }),
                b' ' => seen_space = true,
                0x21..=0x7E if !seen_space => (),
                _ => return Err(InvalidTag::InvalidByte { pos, byte }),
            }
        }
        Ok(())
    }
}

/// An error representing an invalid tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidTag {
    InvalidLength(usize),
    InvalidByte { pos: usize, byte: u8 },
}

impl FromStr for Tag {
    type Err = InvalidTag;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Tag::new_checked(src.as_bytes())
    }
}

impl crate::raw::Scalar for Tag {
    type Raw = [u8; 4];

    fn to_raw(self) -> Self::Raw {
        self.0
    }

    fn from_raw(raw: Self::Raw) -> Self {
        Self(raw)
    }
}

impl PartialEq<&[u8; 4]> for Tag {
    fn eq(&self, other: &&[u8; 4]) -> bool {
        &self.0 == *other
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            if (0x20..0x7F).contains(&byte) {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "{{0x{byte:02X}}}")?;
            }
        }
        Ok(())
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag({self})")
    }
}

impl Display for InvalidTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidTag::InvalidByte { pos, byte } => {
                write!(f, "Invalid byte 0x{byte:02x} at index {pos}")
            }
            InvalidTag::InvalidLength(len) => write!(f, "Invalid length ({len})"),
        }
    }
}

impl std::error::Error for InvalidTag {}

impl Default for Tag {
    fn default() -> Self {
        Tag([b' '; 4])
    }
}

// human-readable formats get a string, everything else the raw bytes.
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
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            <[u8; 4]>::deserialize(deserializer).map(|raw| Tag::new(&raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_construction() {
        assert!(Tag::new_checked(b"").is_err());
        assert!(Tag::new_checked(b" ").is_err());
        assert_eq!(Tag::new_checked(b"cvt"), Ok(Tag::new(b"cvt ")));
        assert!(Tag::new_checked(b"OS/2").is_ok());
        assert!(Tag::new_checked(b"abcde").is_err());
        assert!(Tag::new_checked(b"b c").is_err());
        assert!(Tag::new_checked(&[0x7F]).is_err());
    }

    #[test]
    fn display_non_printable() {
        assert_eq!(Tag::new(b"glyf").to_string(), "glyf");
        assert_eq!(Tag::new(&[b'a', 0, b'c', 0xFF]).to_string(), "a{0x00}c{0xFF}");
    }

    #[test]
    fn ordering_is_bytewise() {
        // the table directory is sorted by tag, which puts uppercase first
        let mut tags = [Tag::new(b"glyf"), Tag::new(b"OS/2"), Tag::new(b"cmap")];
        tags.sort();
        assert_eq!(tags, [Tag::new(b"OS/2"), Tag::new(b"cmap"), Tag::new(b"glyf")]);
        assert_eq!(Tag::new(b"head").to_u32(), 0x68656164);
    }
}
