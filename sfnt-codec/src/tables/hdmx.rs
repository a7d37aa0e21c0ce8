//! The [hdmx (Horizontal Device Metrics)](https://learn.microsoft.com/en-us/typography/opentype/spec/hdmx) table

use font_types::Tag;

use crate::{
    font_data::FontData,
    read::{FontReadWithArgs, ReadArgs, ReadError},
    tables::TopLevelTable,
    util,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

/// Pre-computed advance widths at specific pixel sizes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hdmx {
    pub version: u16,
    pub records: Vec<DeviceRecord>,
}

/// The widths of every glyph at one pixel size.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceRecord {
    pub pixel_size: u8,
    pub max_width: u8,
    /// One width per glyph.
    pub widths: Vec<u8>,
}

impl TopLevelTable for Hdmx {
    const TAG: Tag = Tag::new(b"hdmx");
}

impl Hdmx {
    /// The size of each record, which is padded to a multiple of four.
    pub fn compute_record_size(&self) -> usize {
        let num_glyphs = self
            .records
            .first()
            .map(|rec| rec.widths.len())
            .unwrap_or_default();
        util::round4(2 + num_glyphs)
    }
}

impl DeviceRecord {
    /// Create a record, computing `max_width`.
    pub fn new(pixel_size: u8, widths: Vec<u8>) -> Self {
        let max_width = widths.iter().copied().max().unwrap_or_default();
        DeviceRecord {
            pixel_size,
            max_width,
            widths,
        }
    }
}

impl ReadArgs for Hdmx {
    /// The number of glyphs, from `maxp`.
    type Args = u16;
}

impl FontReadWithArgs for Hdmx {
    fn read_with_args(data: FontData<'_>, num_glyphs: &u16) -> Result<Self, ReadError> {
        let num_glyphs = *num_glyphs as usize;
        let mut cursor = data.cursor();
        let version = cursor.read()?;
        let num_records: i16 = cursor.read()?;
        let record_size = cursor.read::<i32>()? as usize;
        if record_size < 2 + num_glyphs {
            return Err(ReadError::MalformedData("hdmx record size too small"));
        }
        let records = (0..num_records.max(0))
            .map(|_| {
                let record = cursor.read_bytes(record_size)?;
                Ok(DeviceRecord {
                    pixel_size: record[0],
                    max_width: record[1],
                    widths: record[2..2 + num_glyphs].to_vec(),
                })
            })
            .collect::<Result<_, ReadError>>()?;
        Ok(Hdmx { version, records })
    }
}

impl FontWrite for Hdmx {
    fn write_into(&self, writer: &mut TableWriter) {
        let record_size = self.compute_record_size();
        self.version.write_into(writer);
        (self.records.len() as i16).write_into(writer);
        (record_size as i32).write_into(writer);
        for record in &self.records {
            record.pixel_size.write_into(writer);
            record.max_width.write_into(writer);
            writer.write_slice(&record.widths);
            writer.pad_to_4byte_aligned();
        }
    }
}

impl Validate for Hdmx {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("hdmx", |ctx| {
            if self.records.len() > i16::MAX as usize {
                ctx.report("too many device records");
            }
            let num_glyphs = self.records.first().map(|rec| rec.widths.len());
            ctx.in_field("records", |ctx| {
                ctx.in_array(&self.records, |ctx, record| {
                    if Some(record.widths.len()) != num_glyphs {
                        ctx.report("all records must have one width per glyph");
                    }
                })
            });
            if self.records.windows(2).any(|p| p[0].pixel_size >= p[1].pixel_size) {
                ctx.report("records must be sorted by pixel size");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn roundtrip() {
        let hdmx = Hdmx {
            version: 0,
            records: vec![
                DeviceRecord::new(8, vec![4, 0, 5, 6, 4]),
                DeviceRecord::new(12, vec![6, 0, 7, 9, 6]),
            ],
        };
        assert_eq!(hdmx.records[1].max_width, 9);
        let dumped = crate::write::dump_table(&hdmx).unwrap();
        // 2 + 5 widths, padded to 8
        assert_eq!(hdmx.compute_record_size(), 8);
        assert_eq!(dumped.len(), 8 + 2 * 8);
        let loaded = Hdmx::read_with_args(FontData::new(&dumped), &5).unwrap();
        assert_eq!(loaded, hdmx);
    }

    #[test]
    fn record_size_too_small() {
        let data = [0, 0, 0, 1, 0, 0, 0, 4, 8, 6, 1, 2];
        assert!(matches!(
            Hdmx::read_with_args(FontData::new(&data), &5),
            Err(ReadError::MalformedData(_))
        ));
    }

    #[test]
    fn unsorted_records() {
        let hdmx = Hdmx {
            version: 0,
            records: vec![DeviceRecord::new(12, vec![1]), DeviceRecord::new(8, vec![1])],
        };
        assert!(crate::write::dump_table(&hdmx).is_err());
    }
}
