//!  A builder for top-level font objects

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Display;

use font_types::{Tag, APPLE_TT_SFNT_VERSION, CFF_SFNT_VERSION, TT_SFNT_VERSION};

use crate::{
    font_data::FontData,
    read::{FontRead, ReadError},
    tables::{head, TopLevelTable},
    util::{checksum, round4, SearchRange},
    write::{FontWrite, TableWriter},
};

const TABLE_RECORD_LEN: usize = 16;
const HEADER_LEN: usize = 12;

/// The sum that the whole font, including `checksumAdjustment`, adds up to.
pub const CHECKSUM_MAGIC: u32 = 0xB1B0AFBA;

/// The [Table Directory] at the start of every sfnt font.
///
/// [Table Directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableDirectory {
    pub sfnt_version: u32,
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
    pub table_records: Vec<TableRecord>,
}

/// A single entry in the [`TableDirectory`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableRecord {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

/// Build a font from some set of tables.
///
/// Tables are written in tag order, each padded to a four-byte boundary.
#[derive(Debug, Clone)]
pub struct FontBuilder<'a> {
    sfnt_version: u32,
    tables: BTreeMap<Tag, Cow<'a, [u8]>>,
}

/// An error returned when attempting to add a table to the builder.
///
/// This wraps a compilation error, adding the tag of the table where it was
/// encountered.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct BuilderError {
    /// The tag of the root table where the error occurred
    pub tag: Tag,
    /// The underlying error
    pub inner: crate::error::Error,
}

impl TableDirectory {
    pub fn from_table_records(sfnt_version: u32, table_records: Vec<TableRecord>) -> Self {
        // See https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
        let computed = SearchRange::compute(table_records.len(), TABLE_RECORD_LEN);
        TableDirectory {
            sfnt_version,
            search_range: computed.search_range,
            entry_selector: computed.entry_selector,
            range_shift: computed.range_shift,
            table_records,
        }
    }

    pub fn find(&self, tag: Tag) -> Option<&TableRecord> {
        self.table_records.iter().find(|record| record.tag == tag)
    }
}

impl TableRecord {
    pub fn new(tag: Tag, checksum: u32, offset: u32, length: u32) -> Self {
        TableRecord {
            tag,
            checksum,
            offset,
            length,
        }
    }

    /// The table's bytes within the font.
    pub fn data<'a>(&self, font: FontData<'a>) -> Result<FontData<'a>, ReadError> {
        let start = self.offset as usize;
        font.slice(start..start + self.length as usize)
            .ok_or(ReadError::OutOfBounds)
    }
}

impl FontRead for TableDirectory {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let sfnt_version: u32 = cursor.read()?;
        if ![TT_SFNT_VERSION, CFF_SFNT_VERSION, APPLE_TT_SFNT_VERSION].contains(&sfnt_version) {
            return Err(ReadError::InvalidSfnt(sfnt_version));
        }
        let num_tables: u16 = cursor.read()?;
        let search_range = cursor.read()?;
        let entry_selector = cursor.read()?;
        let range_shift = cursor.read()?;
        if cursor.remaining_len() / TABLE_RECORD_LEN < num_tables as usize {
            return Err(ReadError::OutOfBounds);
        }
        let table_records = (0..num_tables)
            .map(|_| {
                Ok(TableRecord {
                    tag: cursor.read()?,
                    checksum: cursor.read()?,
                    offset: cursor.read()?,
                    length: cursor.read()?,
                })
            })
            .collect::<Result<_, ReadError>>()?;
        Ok(TableDirectory {
            sfnt_version,
            search_range,
            entry_selector,
            range_shift,
            table_records,
        })
    }
}

impl FontWrite for TableDirectory {
    fn write_into(&self, writer: &mut TableWriter) {
        self.sfnt_version.write_into(writer);
        (self.table_records.len() as u16).write_into(writer);
        self.search_range.write_into(writer);
        self.entry_selector.write_into(writer);
        self.range_shift.write_into(writer);
        for record in &self.table_records {
            record.tag.write_into(writer);
            record.checksum.write_into(writer);
            record.offset.write_into(writer);
            record.length.write_into(writer);
        }
    }
}

impl Default for FontBuilder<'_> {
    fn default() -> Self {
        FontBuilder::new(TT_SFNT_VERSION)
    }
}

impl<'a> FontBuilder<'a> {
    /// Create a new builder to compile a binary font
    pub fn new(sfnt_version: u32) -> Self {
        FontBuilder {
            sfnt_version,
            tables: BTreeMap::new(),
        }
    }

    /// A builder method to add raw data for the provided tag
    pub fn add_raw(&mut self, tag: Tag, data: impl Into<Cow<'a, [u8]>>) -> &mut Self {
        self.tables.insert(tag, data.into());
        self
    }

    /// Assemble all the tables into a binary font file with a [Table Directory].
    ///
    /// If a `head` table is present its `checksumAdjustment` is computed over
    /// the finished font. The field should be zero in the data that was added.
    ///
    /// [Table Directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
    pub fn build(&mut self) -> Vec<u8> {
        let header_len = HEADER_LEN + self.tables.len() * TABLE_RECORD_LEN;

        let mut position = header_len as u32;
        let table_records: Vec<_> = self
            .tables
            .iter()
            .map(|(tag, data)| {
                let offset = position;
                let length = data.len() as u32;
                position += round4(data.len()) as u32;
                TableRecord::new(*tag, checksum(data), offset, length)
            })
            .collect();

        let directory = TableDirectory::from_table_records(self.sfnt_version, table_records);

        let mut writer = TableWriter::default();
        directory.write_into(&mut writer);
        let mut data = writer.into_data();
        for table in self.tables.values() {
            data.extend_from_slice(table);
            let rem = round4(table.len()) - table.len();
            data.extend_from_slice(&[0u8; 4][..rem]);
        }

        let head_record = directory.find(head::Head::TAG);
        if let Some(record) = head_record.filter(|record| record.length >= 12) {
            let adjustment = CHECKSUM_MAGIC.wrapping_sub(checksum(&data));
            let pos = record.offset as usize + head::CHECKSUM_ADJUSTMENT_OFFSET;
            data[pos..pos + 4].copy_from_slice(&adjustment.to_be_bytes());
            log::trace!("checksumAdjustment 0x{adjustment:08X}");
        }
        data
    }
}

impl Display for BuilderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to build '{}' table: '{}'", self.tag, self.inner)
    }
}

impl std::error::Error for BuilderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_binary_search_assists() {
        // Based on Roboto's num tables
        let data = b"doesn't matter".to_vec();
        let mut builder = FontBuilder::default();
        (0..0x16u32).for_each(|i| {
            builder.add_raw(Tag::from_be_bytes(i.to_ne_bytes()), data.as_slice());
        });
        let bytes = builder.build();
        let td = TableDirectory::read(FontData::new(&bytes)).unwrap();
        assert_eq!(
            (256, 4, 96),
            (td.search_range, td.entry_selector, td.range_shift)
        );
        assert_eq!(td.table_records.len(), 0x16);
    }

    #[test]
    fn survives_no_tables() {
        let bytes = FontBuilder::default().build();
        assert_eq!(bytes, [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn tables_sorted_and_padded() {
        let mut builder = FontBuilder::new(CFF_SFNT_VERSION);
        builder
            .add_raw(Tag::new(b"zzzz"), vec![1, 2, 3])
            .add_raw(Tag::new(b"AAAA"), vec![4, 5, 6, 7, 8]);
        let bytes = builder.build();
        let font = FontData::new(&bytes);
        let td = TableDirectory::read(font).unwrap();
        assert_eq!(td.sfnt_version, CFF_SFNT_VERSION);
        let tags = td.table_records.iter().map(|r| r.tag).collect::<Vec<_>>();
        assert_eq!(tags, [Tag::new(b"AAAA"), Tag::new(b"zzzz")]);

        let first = td.table_records[0];
        let second = td.table_records[1];
        assert_eq!(first.offset, 12 + 32);
        assert_eq!(first.length, 5);
        assert_eq!(second.offset, first.offset + 8);
        assert_eq!(first.data(font).unwrap().as_bytes(), &[4, 5, 6, 7, 8]);
        assert_eq!(first.checksum, 0x0405_0607 + 0x0800_0000);
        assert_eq!(bytes.len(), 12 + 32 + 8 + 4);
    }

    #[test]
    fn checksum_adjustment_is_patched() {
        let head = head::Head::default();
        let mut builder = FontBuilder::default();
        builder.add_raw(head::Head::TAG, crate::write::dump_table(&head).unwrap());
        builder.add_raw(Tag::new(b"abcd"), vec![0xFF; 7]);
        let bytes = builder.build();
        assert_eq!(checksum(&bytes), CHECKSUM_MAGIC);
    }

    #[test]
    fn unsupported_sfnt_version() {
        let mut bytes = FontBuilder::default().build();
        bytes[..4].copy_from_slice(b"ttcf");
        assert_eq!(
            TableDirectory::read(FontData::new(&bytes)),
            Err(ReadError::InvalidSfnt(u32::from_be_bytes(*b"ttcf")))
        );
    }
}
