//! The [cvt (Control Value Table)](https://learn.microsoft.com/en-us/typography/opentype/spec/cvt) table

use font_types::Tag;

use crate::{
    font_data::FontData,
    read::{FontRead, ReadError},
    tables::TopLevelTable,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

/// Values referenced by TrueType instructions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cvt {
    pub values: Vec<i16>,
}

impl TopLevelTable for Cvt {
    const TAG: Tag = Tag::new(b"cvt ");
}

impl FontRead for Cvt {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        if data.len() % 2 != 0 {
            return Err(ReadError::InvalidArrayLen);
        }
        let values = data.cursor().read_array(data.len() / 2)?;
        Ok(Cvt { values })
    }
}

impl FontWrite for Cvt {
    fn write_into(&self, writer: &mut TableWriter) {
        self.values.write_into(writer)
    }
}

impl Validate for Cvt {
    fn validate_impl(&self, _ctx: &mut ValidationCtx) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let data = [0x00, 0x10, 0xFF, 0xF6, 0x05, 0x6B];
        let cvt = Cvt::read(FontData::new(&data)).unwrap();
        assert_eq!(cvt.values, [16, -10, 1387]);
        assert_eq!(crate::write::dump_table(&cvt).unwrap(), data);
    }

    #[test]
    fn odd_length() {
        assert_eq!(
            Cvt::read(FontData::new(&[0, 1, 2])),
            Err(ReadError::InvalidArrayLen)
        );
    }
}
