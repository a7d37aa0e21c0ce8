//! The [maxp (Maximum Profile)](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table

use font_types::{Tag, Version16Dot16};

use crate::{
    font_data::FontData,
    read::{FontRead, ReadError},
    tables::TopLevelTable,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

/// The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table.
///
/// Version 0.5 (used with CFF outlines) contains only the glyph count. The
/// version written is 1.0 if any of the TrueType fields are present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Maxp {
    /// Overwritten from `loca` when a font containing `glyf` is encoded.
    pub num_glyphs: u16,
    pub truetype: Option<TrueTypeProfile>,
}

/// The version 1.0 fields of `maxp`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrueTypeProfile {
    pub max_points: u16,
    pub max_contours: u16,
    pub max_composite_points: u16,
    pub max_composite_contours: u16,
    pub max_zones: u16,
    pub max_twilight_points: u16,
    pub max_storage: u16,
    pub max_function_defs: u16,
    pub max_instruction_defs: u16,
    pub max_stack_elements: u16,
    pub max_size_of_instructions: u16,
    pub max_component_elements: u16,
    pub max_component_depth: u16,
}

impl Maxp {
    /// A version 0.5 table.
    pub fn new(num_glyphs: u16) -> Self {
        Maxp {
            num_glyphs,
            truetype: None,
        }
    }

    fn compute_version(&self) -> Version16Dot16 {
        if self.truetype.is_some() {
            Version16Dot16::VERSION_1_0
        } else {
            Version16Dot16::VERSION_0_5
        }
    }
}

impl TopLevelTable for Maxp {
    const TAG: Tag = Tag::new(b"maxp");
}

impl FontRead for Maxp {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: Version16Dot16 = cursor.read()?;
        let num_glyphs = cursor.read()?;
        let truetype = match version {
            Version16Dot16::VERSION_0_5 => None,
            Version16Dot16::VERSION_1_0 => Some(TrueTypeProfile {
                max_points: cursor.read()?,
                max_contours: cursor.read()?,
                max_composite_points: cursor.read()?,
                max_composite_contours: cursor.read()?,
                max_zones: cursor.read()?,
                max_twilight_points: cursor.read()?,
                max_storage: cursor.read()?,
                max_function_defs: cursor.read()?,
                max_instruction_defs: cursor.read()?,
                max_stack_elements: cursor.read()?,
                max_size_of_instructions: cursor.read()?,
                max_component_elements: cursor.read()?,
                max_component_depth: cursor.read()?,
            }),
            other => return Err(ReadError::InvalidFormat(other.to_bits() as i64)),
        };
        Ok(Maxp {
            num_glyphs,
            truetype,
        })
    }
}

impl FontWrite for Maxp {
    fn write_into(&self, writer: &mut TableWriter) {
        self.compute_version().write_into(writer);
        self.num_glyphs.write_into(writer);
        if let Some(tt) = &self.truetype {
            tt.write_into(writer);
        }
    }
}

impl FontWrite for TrueTypeProfile {
    fn write_into(&self, writer: &mut TableWriter) {
        self.max_points.write_into(writer);
        self.max_contours.write_into(writer);
        self.max_composite_points.write_into(writer);
        self.max_composite_contours.write_into(writer);
        self.max_zones.write_into(writer);
        self.max_twilight_points.write_into(writer);
        self.max_storage.write_into(writer);
        self.max_function_defs.write_into(writer);
        self.max_instruction_defs.write_into(writer);
        self.max_stack_elements.write_into(writer);
        self.max_size_of_instructions.write_into(writer);
        self.max_component_elements.write_into(writer);
        self.max_component_depth.write_into(writer);
    }
}

impl Validate for Maxp {
    fn validate_impl(&self, _ctx: &mut ValidationCtx) {}
}
