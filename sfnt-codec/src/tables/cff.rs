//! The [CFF](https://learn.microsoft.com/en-us/typography/opentype/spec/cff) and
//! [CFF2](https://learn.microsoft.com/en-us/typography/opentype/spec/cff2) tables
//!
//! Charstrings are not interpreted; these tables are carried as bytes, with
//! accessors for the header fields.

use font_types::Tag;

use crate::{
    font_data::FontData,
    read::{FontRead, ReadError},
    tables::TopLevelTable,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

macro_rules! opaque_outline_table {
    ($(#[$attr:meta])* $name:ident, $tag:literal) => {
        $(#[$attr])*
        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            pub data: Vec<u8>,
        }

        impl $name {
            pub fn new(data: Vec<u8>) -> Self {
                Self { data }
            }

            pub fn major_version(&self) -> Option<u8> {
                self.data.first().copied()
            }

            pub fn minor_version(&self) -> Option<u8> {
                self.data.get(1).copied()
            }

            /// The size of the header, and so the offset of the first INDEX
            /// or DICT.
            pub fn header_size(&self) -> Option<u8> {
                self.data.get(2).copied()
            }
        }

        impl TopLevelTable for $name {
            const TAG: Tag = Tag::new($tag);
        }

        impl FontRead for $name {
            fn read(data: FontData<'_>) -> Result<Self, ReadError> {
                // the fixed part of the header must be present
                data.read_at::<u16>(2)?;
                Ok(Self::new(data.as_bytes().to_vec()))
            }
        }

        impl FontWrite for $name {
            fn write_into(&self, writer: &mut TableWriter) {
                writer.write_slice(&self.data)
            }
        }

        impl Validate for $name {
            fn validate_impl(&self, _ctx: &mut ValidationCtx) {}
        }
    };
}

opaque_outline_table!(
    /// The Compact Font Format table, holding PostScript outlines.
    Cff,
    b"CFF "
);

opaque_outline_table!(
    /// Version 2 of the Compact Font Format, used for variable fonts.
    Cff2,
    b"CFF2"
);

impl Cff {
    /// The size of offsets in the font's INDEX data.
    pub fn off_size(&self) -> Option<u8> {
        self.data.get(3).copied()
    }
}

impl Cff2 {
    /// The length of the top DICT that follows the header.
    pub fn top_dict_length(&self) -> Option<u16> {
        FontData::new(&self.data).read_at(3).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cff_header() {
        let cff = Cff::read(FontData::new(&[1, 0, 4, 2, 0xAA, 0xBB])).unwrap();
        assert_eq!(cff.major_version(), Some(1));
        assert_eq!(cff.minor_version(), Some(0));
        assert_eq!(cff.header_size(), Some(4));
        assert_eq!(cff.off_size(), Some(2));
        assert_eq!(
            crate::write::dump_table(&cff).unwrap(),
            [1, 0, 4, 2, 0xAA, 0xBB]
        );
    }

    #[test]
    fn cff2_header() {
        let cff2 = Cff2::read(FontData::new(&[2, 0, 5, 0x01, 0x02])).unwrap();
        assert_eq!(cff2.major_version(), Some(2));
        assert_eq!(cff2.top_dict_length(), Some(0x0102));
    }

    #[test]
    fn too_short() {
        assert_eq!(
            Cff::read(FontData::new(&[1, 0])),
            Err(ReadError::OutOfBounds)
        );
    }
}
