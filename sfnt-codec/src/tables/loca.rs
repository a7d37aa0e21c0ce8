//! The [loca (Index to Location)][loca] table
//!
//! [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca

use std::ops::Range;

use font_types::Tag;

use crate::{
    font_data::FontData,
    read::{FontReadWithArgs, ReadArgs, ReadError},
    tables::TopLevelTable,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

// https://github.com/fonttools/fonttools/blob/1c283756a5e39d69459eea80ed12792adc4922dd/Lib/fontTools/ttLib/tables/_l_o_c_a.py#L37
const MAX_SHORT_LOCA_VALUE: u32 = 0x20000;

/// The [loca] table.
///
/// Offsets are always stored as byte offsets into `glyf`; short tables store
/// them halved on disk.
///
/// [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Loca {
    /// One offset per glyph, plus a final offset marking the end of the last
    /// glyph.
    pub offsets: Vec<u32>,
    pub format: LocaFormat,
}

/// Whether or not the 'loca' table uses short or long offsets.
///
/// This flag is stored in the 'head' table's [indexToLocFormat][locformat] field.
///
/// [locformat]: super::head::Head::index_to_loc_format
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocaFormat {
    #[default]
    Short = 0,
    Long = 1,
}

impl TopLevelTable for Loca {
    const TAG: Tag = Tag::new(b"loca");
}

impl Loca {
    /// Create a new loca table from 32-bit offsets.
    ///
    /// The smallest format that can represent the offsets is chosen.
    pub fn new(offsets: Vec<u32>) -> Self {
        let format = LocaFormat::for_offsets(&offsets);
        Loca { offsets, format }
    }

    /// The number of glyphs located by this table.
    pub fn num_glyphs(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// The byte range of a glyph within `glyf`.
    pub fn glyph_range(&self, gid: u16) -> Option<Range<usize>> {
        let idx = gid as usize;
        let start = *self.offsets.get(idx)?;
        let end = *self.offsets.get(idx + 1)?;
        Some(start as usize..end as usize)
    }
}

impl LocaFormat {
    /// The smallest format able to store these offsets.
    pub fn for_offsets(offsets: &[u32]) -> LocaFormat {
        if LocaFormat::Short.can_represent(offsets) {
            LocaFormat::Short
        } else {
            LocaFormat::Long
        }
    }

    /// `true` if every offset can be written in this format.
    pub fn can_represent(self, offsets: &[u32]) -> bool {
        match self {
            LocaFormat::Long => true,
            LocaFormat::Short => {
                offsets.last().copied().unwrap_or_default() < MAX_SHORT_LOCA_VALUE
                    && offsets.iter().all(|offset| offset % 2 == 0)
            }
        }
    }

    /// Interpret `head.index_to_loc_format`.
    pub fn from_index_to_loc_format(raw: i16) -> LocaFormat {
        if raw == 0 {
            LocaFormat::Short
        } else {
            LocaFormat::Long
        }
    }

    /// The value stored in `head.index_to_loc_format`.
    pub fn to_index_to_loc_format(self) -> i16 {
        self as u8 as i16
    }
}

impl ReadArgs for Loca {
    type Args = LocaFormat;
}

impl FontReadWithArgs for Loca {
    /// Read every offset present in the table.
    ///
    /// The number of offsets is not checked against `maxp` here; that happens
    /// when `glyf` is decoded.
    fn read_with_args(data: FontData<'_>, format: &LocaFormat) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let offsets = match format {
            LocaFormat::Short => cursor
                .read_array::<u16>(data.len() / 2)?
                .into_iter()
                .map(|off| off as u32 * 2)
                .collect(),
            LocaFormat::Long => cursor.read_array::<u32>(data.len() / 4)?,
        };
        Ok(Loca {
            offsets,
            format: *format,
        })
    }
}

impl FontWrite for Loca {
    fn write_into(&self, writer: &mut TableWriter) {
        match self.format {
            LocaFormat::Long => self.offsets.write_into(writer),
            LocaFormat::Short => self
                .offsets
                .iter()
                .for_each(|off| ((off >> 1) as u16).write_into(writer)),
        }
    }
}

impl Validate for Loca {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("loca", |ctx| {
            ctx.in_field("offsets", |ctx| {
                if self.offsets.windows(2).any(|pair| pair[0] > pair[1]) {
                    ctx.report("offsets must be non-decreasing");
                }
                if !self.format.can_represent(&self.offsets) {
                    ctx.report("offsets cannot be represented in the short format");
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFSETS: [u32; 5] = [0, 152, 152, 152, 864];

    #[test]
    fn encode_short() {
        let loca = Loca {
            offsets: OFFSETS.to_vec(),
            format: LocaFormat::Short,
        };
        let dumped = crate::write::dump_table(&loca).unwrap();
        assert_eq!(dumped, font_test_data::loca::SHORT);
    }

    #[test]
    fn encode_long() {
        let loca = Loca {
            offsets: OFFSETS.to_vec(),
            format: LocaFormat::Long,
        };
        let dumped = crate::write::dump_table(&loca).unwrap();
        assert_eq!(dumped, font_test_data::loca::LONG);
    }

    #[test]
    fn decode_both_formats() {
        let short =
            Loca::read_with_args(FontData::new(font_test_data::loca::SHORT), &LocaFormat::Short)
                .unwrap();
        let long =
            Loca::read_with_args(FontData::new(font_test_data::loca::LONG), &LocaFormat::Long)
                .unwrap();
        assert_eq!(short.offsets, OFFSETS);
        assert_eq!(long.offsets, OFFSETS);
        assert_eq!(short.glyph_range(3), Some(152..864));
        assert_eq!(short.glyph_range(4), None);
    }

    #[test]
    fn format_selection() {
        assert_eq!(LocaFormat::for_offsets(&OFFSETS), LocaFormat::Short);
        assert_eq!(LocaFormat::for_offsets(&[0, 3]), LocaFormat::Long);
        assert_eq!(LocaFormat::for_offsets(&[0, 0x1FFFE]), LocaFormat::Short);
        assert_eq!(LocaFormat::for_offsets(&[0, 0x20000]), LocaFormat::Long);
    }

    #[test]
    fn short_cannot_hold_odd_offsets() {
        let loca = Loca {
            offsets: vec![0, 7],
            format: LocaFormat::Short,
        };
        assert!(crate::write::dump_table(&loca).is_err());
    }
}
