//! The [head (Font Header)](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table

use font_types::{Fixed, LongDateTime, Tag};

use crate::{
    font_data::FontData,
    read::{FontRead, ReadError},
    tables::TopLevelTable,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

/// The value written to [`Head::magic_number`].
pub const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

/// The position of the `checksumAdjustment` field within the table.
pub const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;

/// The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Head {
    pub version: Fixed,
    pub font_revision: Fixed,
    /// Set when the font is encoded, so that the whole font sums to
    /// `0xB1B0AFBA`.
    pub checksum_adjustment: u32,
    pub magic_number: u32,
    pub flags: u16,
    pub units_per_em: u16,
    pub created: LongDateTime,
    pub modified: LongDateTime,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub mac_style: u16,
    pub lowest_rec_ppem: u16,
    pub font_direction_hint: i16,
    /// 0 for short `loca` offsets, 1 for long.
    ///
    /// Overwritten when a font containing `glyf` is encoded.
    pub index_to_loc_format: i16,
    pub glyph_data_format: i16,
}

impl Default for Head {
    fn default() -> Self {
        Head {
            version: Fixed::ONE,
            font_revision: Fixed::ONE,
            checksum_adjustment: 0,
            magic_number: MAGIC_NUMBER,
            flags: 0,
            units_per_em: 1000,
            created: LongDateTime::default(),
            modified: LongDateTime::default(),
            x_min: 0,
            y_min: 0,
            x_max: 0,
            y_max: 0,
            mac_style: 0,
            lowest_rec_ppem: 0,
            font_direction_hint: 2,
            index_to_loc_format: 0,
            glyph_data_format: 0,
        }
    }
}

impl TopLevelTable for Head {
    const TAG: Tag = Tag::new(b"head");
}

impl FontRead for Head {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        Ok(Head {
            version: cursor.read()?,
            font_revision: cursor.read()?,
            checksum_adjustment: cursor.read()?,
            magic_number: cursor.read()?,
            flags: cursor.read()?,
            units_per_em: cursor.read()?,
            created: cursor.read()?,
            modified: cursor.read()?,
            x_min: cursor.read()?,
            y_min: cursor.read()?,
            x_max: cursor.read()?,
            y_max: cursor.read()?,
            mac_style: cursor.read()?,
            lowest_rec_ppem: cursor.read()?,
            font_direction_hint: cursor.read()?,
            index_to_loc_format: cursor.read()?,
            glyph_data_format: cursor.read()?,
        })
    }
}

impl FontWrite for Head {
    fn write_into(&self, writer: &mut TableWriter) {
        self.version.write_into(writer);
        self.font_revision.write_into(writer);
        self.checksum_adjustment.write_into(writer);
        self.magic_number.write_into(writer);
        self.flags.write_into(writer);
        self.units_per_em.write_into(writer);
        self.created.write_into(writer);
        self.modified.write_into(writer);
        self.x_min.write_into(writer);
        self.y_min.write_into(writer);
        self.x_max.write_into(writer);
        self.y_max.write_into(writer);
        self.mac_style.write_into(writer);
        self.lowest_rec_ppem.write_into(writer);
        self.font_direction_hint.write_into(writer);
        self.index_to_loc_format.write_into(writer);
        self.glyph_data_format.write_into(writer);
    }
}

impl Validate for Head {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("head", |ctx| {
            if !(16..=16384).contains(&self.units_per_em) {
                log::warn!("unitsPerEm {} is outside 16..=16384", self.units_per_em);
            }
            ctx.in_field("index_to_loc_format", |ctx| {
                if !matches!(self.index_to_loc_format, 0 | 1) {
                    ctx.report("indexToLocFormat must be 0 or 1");
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_head() -> Head {
        Head {
            version: Fixed::ONE,
            font_revision: Fixed::ONE,
            checksum_adjustment: 0,
            magic_number: MAGIC_NUMBER,
            flags: 3,
            units_per_em: 2048,
            created: LongDateTime::new(0xdc8b4a14),
            modified: LongDateTime::new(0xdc8b4a14),
            x_min: 0,
            y_min: 0,
            x_max: 1456,
            y_max: 1387,
            mac_style: 0,
            lowest_rec_ppem: 9,
            font_direction_hint: 2,
            index_to_loc_format: 0,
            glyph_data_format: 0,
        }
    }

    #[test]
    fn encode_known_bytes() {
        let dumped = crate::write::dump_table(&test_head()).unwrap();
        assert_eq!(dumped, font_test_data::head::SIMPLE);
        assert_eq!(dumped.len(), 54);
    }

    #[test]
    fn decode_known_bytes() {
        let head = Head::read(FontData::new(font_test_data::head::SIMPLE)).unwrap();
        assert_eq!(head, test_head());
    }

    #[test]
    fn bad_loca_format() {
        let head = Head {
            index_to_loc_format: 2,
            ..Default::default()
        };
        assert!(crate::write::dump_table(&head).is_err());
    }

    #[test]
    fn truncated() {
        let data = &font_test_data::head::SIMPLE[..50];
        assert_eq!(
            Head::read(FontData::new(data)),
            Err(ReadError::OutOfBounds)
        );
    }
}
