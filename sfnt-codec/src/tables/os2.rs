//! The [OS/2 (OS/2 and Windows Metrics)](https://docs.microsoft.com/en-us/typography/opentype/spec/os2) table

use font_types::Tag;

use crate::{
    font_data::FontData,
    read::{FontRead, ReadError},
    tables::TopLevelTable,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

/// The [OS/2] table.
///
/// Fields added in later versions are optional. The original version 0
/// layout (68 bytes) stops after `us_last_char_index`; the fields from
/// `s_typo_ascender` to `us_win_descent` are absent in that case.
///
/// [OS/2]: https://docs.microsoft.com/en-us/typography/opentype/spec/os2
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Os2 {
    pub version: u16,
    pub x_avg_char_width: i16,
    pub us_weight_class: u16,
    pub us_width_class: u16,
    pub fs_type: u16,
    pub y_subscript_x_size: i16,
    pub y_subscript_y_size: i16,
    pub y_subscript_x_offset: i16,
    pub y_subscript_y_offset: i16,
    pub y_superscript_x_size: i16,
    pub y_superscript_y_size: i16,
    pub y_superscript_x_offset: i16,
    pub y_superscript_y_offset: i16,
    pub y_strikeout_size: i16,
    pub y_strikeout_position: i16,
    pub s_family_class: i16,
    pub panose_10: [u8; 10],
    pub ul_unicode_range_1: u32,
    pub ul_unicode_range_2: u32,
    pub ul_unicode_range_3: u32,
    pub ul_unicode_range_4: u32,
    pub ach_vend_id: Tag,
    pub fs_selection: u16,
    pub us_first_char_index: u16,
    pub us_last_char_index: u16,
    pub s_typo_ascender: Option<i16>,
    pub s_typo_descender: Option<i16>,
    pub s_typo_line_gap: Option<i16>,
    pub us_win_ascent: Option<u16>,
    pub us_win_descent: Option<u16>,
    /// Version 1 and later.
    pub ul_code_page_range_1: Option<u32>,
    pub ul_code_page_range_2: Option<u32>,
    /// Version 2 and later.
    pub sx_height: Option<i16>,
    pub s_cap_height: Option<i16>,
    pub us_default_char: Option<u16>,
    pub us_break_char: Option<u16>,
    pub us_max_context: Option<u16>,
    /// Version 5 and later.
    pub us_lower_optical_point_size: Option<u16>,
    pub us_upper_optical_point_size: Option<u16>,
}

impl TopLevelTable for Os2 {
    const TAG: Tag = Tag::new(b"OS/2");
}

const LEGACY_V0_LEN: usize = 68;

impl Os2 {
    fn has_win_metrics(&self) -> bool {
        self.s_typo_ascender.is_some()
    }

    /// The length of the table as written.
    pub fn compute_length(&self) -> usize {
        let mut len = LEGACY_V0_LEN;
        if self.has_win_metrics() {
            len += 10;
        }
        if self.version >= 1 {
            len += 8;
        }
        if self.version >= 2 {
            len += 10;
        }
        if self.version >= 5 {
            len += 4;
        }
        len
    }
}

impl FontRead for Os2 {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: u16 = cursor.read()?;
        if version > 5 {
            return Err(ReadError::InvalidFormat(version as _));
        }
        let mut table = Os2 {
            version,
            x_avg_char_width: cursor.read()?,
            us_weight_class: cursor.read()?,
            us_width_class: cursor.read()?,
            fs_type: cursor.read()?,
            y_subscript_x_size: cursor.read()?,
            y_subscript_y_size: cursor.read()?,
            y_subscript_x_offset: cursor.read()?,
            y_subscript_y_offset: cursor.read()?,
            y_superscript_x_size: cursor.read()?,
            y_superscript_y_size: cursor.read()?,
            y_superscript_x_offset: cursor.read()?,
            y_superscript_y_offset: cursor.read()?,
            y_strikeout_size: cursor.read()?,
            y_strikeout_position: cursor.read()?,
            s_family_class: cursor.read()?,
            ..Default::default()
        };
        table.panose_10.copy_from_slice(cursor.read_bytes(10)?);
        table.ul_unicode_range_1 = cursor.read()?;
        table.ul_unicode_range_2 = cursor.read()?;
        table.ul_unicode_range_3 = cursor.read()?;
        table.ul_unicode_range_4 = cursor.read()?;
        table.ach_vend_id = cursor.read()?;
        table.fs_selection = cursor.read()?;
        table.us_first_char_index = cursor.read()?;
        table.us_last_char_index = cursor.read()?;

        // the legacy version 0 layout ends here
        if version == 0 && cursor.remaining_len() < 10 {
            return Ok(table);
        }
        table.s_typo_ascender = Some(cursor.read()?);
        table.s_typo_descender = Some(cursor.read()?);
        table.s_typo_line_gap = Some(cursor.read()?);
        table.us_win_ascent = Some(cursor.read()?);
        table.us_win_descent = Some(cursor.read()?);
        if version >= 1 {
            table.ul_code_page_range_1 = Some(cursor.read()?);
            table.ul_code_page_range_2 = Some(cursor.read()?);
        }
        if version >= 2 {
            table.sx_height = Some(cursor.read()?);
            table.s_cap_height = Some(cursor.read()?);
            table.us_default_char = Some(cursor.read()?);
            table.us_break_char = Some(cursor.read()?);
            table.us_max_context = Some(cursor.read()?);
        }
        if version >= 5 {
            table.us_lower_optical_point_size = Some(cursor.read()?);
            table.us_upper_optical_point_size = Some(cursor.read()?);
        }
        Ok(table)
    }
}

impl FontWrite for Os2 {
    fn write_into(&self, writer: &mut TableWriter) {
        self.version.write_into(writer);
        self.x_avg_char_width.write_into(writer);
        self.us_weight_class.write_into(writer);
        self.us_width_class.write_into(writer);
        self.fs_type.write_into(writer);
        [
            self.y_subscript_x_size,
            self.y_subscript_y_size,
            self.y_subscript_x_offset,
            self.y_subscript_y_offset,
            self.y_superscript_x_size,
            self.y_superscript_y_size,
            self.y_superscript_x_offset,
            self.y_superscript_y_offset,
            self.y_strikeout_size,
            self.y_strikeout_position,
            self.s_family_class,
        ]
        .write_into(writer);
        writer.write_slice(&self.panose_10);
        [
            self.ul_unicode_range_1,
            self.ul_unicode_range_2,
            self.ul_unicode_range_3,
            self.ul_unicode_range_4,
        ]
        .write_into(writer);
        self.ach_vend_id.write_into(writer);
        self.fs_selection.write_into(writer);
        self.us_first_char_index.write_into(writer);
        self.us_last_char_index.write_into(writer);
        if !self.has_win_metrics() {
            return;
        }
        self.s_typo_ascender.unwrap_or_default().write_into(writer);
        self.s_typo_descender.unwrap_or_default().write_into(writer);
        self.s_typo_line_gap.unwrap_or_default().write_into(writer);
        self.us_win_ascent.unwrap_or_default().write_into(writer);
        self.us_win_descent.unwrap_or_default().write_into(writer);
        if self.version >= 1 {
            self.ul_code_page_range_1.unwrap_or_default().write_into(writer);
            self.ul_code_page_range_2.unwrap_or_default().write_into(writer);
        }
        if self.version >= 2 {
            self.sx_height.unwrap_or_default().write_into(writer);
            self.s_cap_height.unwrap_or_default().write_into(writer);
            self.us_default_char.unwrap_or_default().write_into(writer);
            self.us_break_char.unwrap_or_default().write_into(writer);
            self.us_max_context.unwrap_or_default().write_into(writer);
        }
        if self.version >= 5 {
            self.us_lower_optical_point_size
                .unwrap_or_default()
                .write_into(writer);
            self.us_upper_optical_point_size
                .unwrap_or_default()
                .write_into(writer);
        }
    }
}

impl Validate for Os2 {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("OS/2", |ctx| {
            let version = self.version;
            let check = |ctx: &mut ValidationCtx, name: &'static str, present: bool, min: u16| {
                if present != (version >= min) {
                    ctx.in_field(name, |ctx| {
                        ctx.report(format!(
                            "field must be present if and only if version >= {min} (version is {version})"
                        ))
                    });
                }
            };
            if version > 5 {
                ctx.report(format!("unknown version {version}"));
            }
            let win_metrics = [
                self.s_typo_ascender.is_some(),
                self.s_typo_descender.is_some(),
                self.s_typo_line_gap.is_some(),
                self.us_win_ascent.is_some(),
                self.us_win_descent.is_some(),
            ];
            if win_metrics.iter().any(|present| *present != win_metrics[0]) {
                ctx.report("typo and win metrics must all be present or all absent");
            }
            if version > 0 && !self.has_win_metrics() {
                ctx.report("only version 0 may omit typo and win metrics");
            }
            check(ctx, "ul_code_page_range_1", self.ul_code_page_range_1.is_some(), 1);
            check(ctx, "ul_code_page_range_2", self.ul_code_page_range_2.is_some(), 1);
            check(ctx, "sx_height", self.sx_height.is_some(), 2);
            check(ctx, "s_cap_height", self.s_cap_height.is_some(), 2);
            check(ctx, "us_default_char", self.us_default_char.is_some(), 2);
            check(ctx, "us_break_char", self.us_break_char.is_some(), 2);
            check(ctx, "us_max_context", self.us_max_context.is_some(), 2);
            check(
                ctx,
                "us_lower_optical_point_size",
                self.us_lower_optical_point_size.is_some(),
                5,
            );
            check(
                ctx,
                "us_upper_optical_point_size",
                self.us_upper_optical_point_size.is_some(),
                5,
            );
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn make_os2(version: u16) -> Os2 {
        let mut table = Os2 {
            version,
            x_avg_char_width: 1045,
            us_weight_class: 400,
            us_width_class: 5,
            fs_type: 8,
            y_strikeout_size: 102,
            y_strikeout_position: 530,
            panose_10: [2, 11, 5, 3, 3, 4, 3, 2, 2, 4],
            ul_unicode_range_1: 0xE00002FF,
            ach_vend_id: Tag::new(b"TEST"),
            fs_selection: 0x40,
            us_first_char_index: 0x20,
            us_last_char_index: 0xFFFC,
            ..Default::default()
        };
        if version > 0 {
            table.s_typo_ascender = Some(1536);
            table.s_typo_descender = Some(-512);
            table.s_typo_line_gap = Some(102);
            table.us_win_ascent = Some(1900);
            table.us_win_descent = Some(500);
            table.ul_code_page_range_1 = Some(0x2000019F);
            table.ul_code_page_range_2 = Some(0);
        }
        if version > 1 {
            table.sx_height = Some(1082);
            table.s_cap_height = Some(1456);
            table.us_default_char = Some(0);
            table.us_break_char = Some(32);
            table.us_max_context = Some(3);
        }
        if version > 4 {
            table.us_lower_optical_point_size = Some(0);
            table.us_upper_optical_point_size = Some(0xFFFF);
        }
        table
    }

    #[rstest]
    #[case::v1(1, 86)]
    #[case::v2(2, 96)]
    #[case::v3(3, 96)]
    #[case::v4(4, 96)]
    #[case::v5(5, 100)]
    fn versions_roundtrip(#[case] version: u16, #[case] len: usize) {
        let table = make_os2(version);
        let dumped = crate::write::dump_table(&table).unwrap();
        assert_eq!(dumped.len(), len);
        assert_eq!(table.compute_length(), len);
        let loaded = Os2::read(FontData::new(&dumped)).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn legacy_version_0() {
        let table = make_os2(0);
        let dumped = crate::write::dump_table(&table).unwrap();
        assert_eq!(dumped.len(), 68);
        assert_eq!(Os2::read(FontData::new(&dumped)).unwrap(), table);
    }

    #[test]
    fn full_version_0() {
        let table = Os2 {
            s_typo_ascender: Some(800),
            s_typo_descender: Some(-200),
            s_typo_line_gap: Some(0),
            us_win_ascent: Some(1000),
            us_win_descent: Some(200),
            ..make_os2(0)
        };
        let dumped = crate::write::dump_table(&table).unwrap();
        assert_eq!(dumped.len(), 78);
        assert_eq!(Os2::read(FontData::new(&dumped)).unwrap(), table);
    }

    #[test]
    fn missing_version_fields() {
        let table = Os2 {
            sx_height: None,
            ..make_os2(3)
        };
        let err = crate::write::dump_table(&table).unwrap_err();
        assert!(err.to_string().contains("sx_height"), "{err}");
    }

    #[test]
    fn truncated_v2() {
        let dumped = crate::write::dump_table(&make_os2(2)).unwrap();
        assert_eq!(
            Os2::read(FontData::new(&dumped[..90])),
            Err(ReadError::OutOfBounds)
        );
    }
}
