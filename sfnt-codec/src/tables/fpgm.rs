//! The [fpgm (Font Program)](https://learn.microsoft.com/en-us/typography/opentype/spec/fpgm) table

use font_types::Tag;

use crate::{
    font_data::FontData,
    read::{FontRead, ReadError},
    tables::TopLevelTable,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

/// Instructions run once, when the font is first used.
///
/// The bytecode is not interpreted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fpgm {
    pub instructions: Vec<u8>,
}

impl TopLevelTable for Fpgm {
    const TAG: Tag = Tag::new(b"fpgm");
}

impl FontRead for Fpgm {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        Ok(Fpgm {
            instructions: data.as_bytes().to_vec(),
        })
    }
}

impl FontWrite for Fpgm {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write_slice(&self.instructions)
    }
}

impl Validate for Fpgm {
    fn validate_impl(&self, _ctx: &mut ValidationCtx) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_preserved() {
        // PUSHB[0] 0, FDEF, ENDF
        let data = [0xB0, 0x00, 0x2C, 0x2D];
        let fpgm = Fpgm::read(FontData::new(&data)).unwrap();
        assert_eq!(fpgm.instructions, data);
        assert_eq!(crate::write::dump_table(&fpgm).unwrap(), data);
    }
}
