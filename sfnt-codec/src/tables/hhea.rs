//! The [hhea (Horizontal Header)](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea) table

use font_types::{Fixed, Tag};

use crate::{
    font_data::FontData,
    read::{FontRead, ReadError},
    tables::TopLevelTable,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

/// The [hhea](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea) table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hhea {
    pub version: Fixed,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub advance_width_max: u16,
    pub min_left_side_bearing: i16,
    pub min_right_side_bearing: i16,
    pub x_max_extent: i16,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub caret_offset: i16,
    pub metric_data_format: i16,
    /// The number of full `(advance, lsb)` records in `hmtx`.
    ///
    /// Synchronized with `hmtx` when a font is encoded.
    pub number_of_h_metrics: u16,
}

impl Default for Hhea {
    fn default() -> Self {
        Hhea {
            version: Fixed::ONE,
            ascender: 0,
            descender: 0,
            line_gap: 0,
            advance_width_max: 0,
            min_left_side_bearing: 0,
            min_right_side_bearing: 0,
            x_max_extent: 0,
            caret_slope_rise: 1,
            caret_slope_run: 0,
            caret_offset: 0,
            metric_data_format: 0,
            number_of_h_metrics: 0,
        }
    }
}

impl TopLevelTable for Hhea {
    const TAG: Tag = Tag::new(b"hhea");
}

impl FontRead for Hhea {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read()?;
        let ascender = cursor.read()?;
        let descender = cursor.read()?;
        let line_gap = cursor.read()?;
        let advance_width_max = cursor.read()?;
        let min_left_side_bearing = cursor.read()?;
        let min_right_side_bearing = cursor.read()?;
        let x_max_extent = cursor.read()?;
        let caret_slope_rise = cursor.read()?;
        let caret_slope_run = cursor.read()?;
        let caret_offset = cursor.read()?;
        // four reserved int16s
        cursor.advance_by(8)?;
        Ok(Hhea {
            version,
            ascender,
            descender,
            line_gap,
            advance_width_max,
            min_left_side_bearing,
            min_right_side_bearing,
            x_max_extent,
            caret_slope_rise,
            caret_slope_run,
            caret_offset,
            metric_data_format: cursor.read()?,
            number_of_h_metrics: cursor.read()?,
        })
    }
}

impl FontWrite for Hhea {
    fn write_into(&self, writer: &mut TableWriter) {
        self.version.write_into(writer);
        self.ascender.write_into(writer);
        self.descender.write_into(writer);
        self.line_gap.write_into(writer);
        self.advance_width_max.write_into(writer);
        self.min_left_side_bearing.write_into(writer);
        self.min_right_side_bearing.write_into(writer);
        self.x_max_extent.write_into(writer);
        self.caret_slope_rise.write_into(writer);
        self.caret_slope_run.write_into(writer);
        self.caret_offset.write_into(writer);
        writer.write_slice(&[0; 8]);
        self.metric_data_format.write_into(writer);
        self.number_of_h_metrics.write_into(writer);
    }
}

impl Validate for Hhea {
    fn validate_impl(&self, _ctx: &mut ValidationCtx) {}
}
