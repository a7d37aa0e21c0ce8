//! The [prep (Control Value Program)](https://learn.microsoft.com/en-us/typography/opentype/spec/prep) table

use font_types::Tag;

use crate::{
    font_data::FontData,
    read::{FontRead, ReadError},
    tables::TopLevelTable,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

/// Instructions run whenever the point size or transform changes.
///
/// The bytecode is not interpreted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prep {
    pub instructions: Vec<u8>,
}

impl TopLevelTable for Prep {
    const TAG: Tag = Tag::new(b"prep");
}

impl FontRead for Prep {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        Ok(Prep {
            instructions: data.as_bytes().to_vec(),
        })
    }
}

impl FontWrite for Prep {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write_slice(&self.instructions)
    }
}

impl Validate for Prep {
    fn validate_impl(&self, _ctx: &mut ValidationCtx) {}
}
