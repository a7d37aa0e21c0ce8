//! The [DSIG](https://learn.microsoft.com/en-us/typography/opentype/spec/dsig) table
//!
//! Signature blocks are kept as bytes; they are never verified.

use font_types::Tag;

use crate::{
    font_data::FontData,
    read::{FontRead, ReadError},
    tables::TopLevelTable,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, RawBytes, TableWriter},
};

bitflags::bitflags! {
    /// [Permission flags](https://learn.microsoft.com/en-us/typography/opentype/spec/dsig#table-structure)
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PermissionFlags: u16 {
        /// Cannot be resigned
        const CANNOT_BE_RESIGNED = 0x0001;
        const _ = !0;
    }
}

/// The digital signature table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dsig {
    pub version: u32,
    pub flags: PermissionFlags,
    pub signature_records: Vec<SignatureRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureRecord {
    /// Format of the signature block; only format 1 is defined.
    pub format: u32,
    /// The signature block, including its header.
    pub signature_block: Vec<u8>,
}

impl TopLevelTable for Dsig {
    const TAG: Tag = Tag::new(b"DSIG");
}

impl Default for Dsig {
    /// The empty placeholder table some tools require.
    fn default() -> Self {
        Dsig {
            version: 1,
            flags: PermissionFlags::empty(),
            signature_records: Vec::new(),
        }
    }
}

impl FontRead for Dsig {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read()?;
        let num_signatures: u16 = cursor.read()?;
        let flags = PermissionFlags::from_bits_retain(cursor.read()?);
        let signature_records = (0..num_signatures)
            .map(|_| {
                let format = cursor.read()?;
                let length = cursor.read::<u32>()? as usize;
                let offset = cursor.read::<u32>()? as usize;
                let block = data
                    .slice(offset..offset.saturating_add(length))
                    .ok_or(ReadError::OutOfBounds)?;
                Ok(SignatureRecord {
                    format,
                    signature_block: block.as_bytes().to_vec(),
                })
            })
            .collect::<Result<_, ReadError>>()?;
        Ok(Dsig {
            version,
            flags,
            signature_records,
        })
    }
}

impl FontWrite for Dsig {
    fn write_into(&self, writer: &mut TableWriter) {
        self.version.write_into(writer);
        (self.signature_records.len() as u16).write_into(writer);
        self.flags.bits().write_into(writer);
        for record in &self.signature_records {
            record.format.write_into(writer);
            (record.signature_block.len() as u32).write_into(writer);
            writer.write_offset(&RawBytes(&record.signature_block), 4);
        }
    }
}

impl Validate for Dsig {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("DSIG", |ctx| {
            ctx.in_field("signature_records", |ctx| {
                if self.signature_records.len() > u16::MAX as usize {
                    ctx.report("too many signatures");
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::dump_table;

    #[test]
    fn empty_placeholder() {
        let bytes = dump_table(&Dsig::default()).unwrap();
        assert_eq!(bytes, [0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(Dsig::read(FontData::new(&bytes)).unwrap(), Dsig::default());
    }

    #[test]
    fn signature_blocks_are_opaque() {
        let dsig = Dsig {
            version: 1,
            flags: PermissionFlags::CANNOT_BE_RESIGNED,
            signature_records: vec![SignatureRecord {
                format: 1,
                signature_block: vec![0, 0, 0, 0, 0, 0, 0, 2, 0x30, 0x82],
            }],
        };
        let bytes = dump_table(&dsig).unwrap();
        // header, one record, then the block
        assert_eq!(bytes.len(), 8 + 12 + 10);
        assert_eq!(&bytes[16..20], &[0, 0, 0, 20]);
        assert_eq!(Dsig::read(FontData::new(&bytes)).unwrap(), dsig);
    }

    #[test]
    fn block_out_of_bounds() {
        let bytes = [0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 8, 0, 0, 0, 20];
        assert_eq!(
            Dsig::read(FontData::new(&bytes)),
            Err(ReadError::OutOfBounds)
        );
    }
}
