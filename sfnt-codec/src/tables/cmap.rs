//! the [cmap] table
//!
//! [cmap]: https://docs.microsoft.com/en-us/typography/opentype/spec/cmap

use std::collections::HashMap;

use font_types::{GlyphId16, Tag};

use crate::{
    font_data::FontData,
    read::{FontRead, ReadError},
    tables::TopLevelTable,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

mod format4;

pub use format4::{Cmap4, Segment};

// https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#platform-ids
pub const UNICODE_PLATFORM: u16 = 0;
pub const MACINTOSH_PLATFORM: u16 = 1;
pub const WINDOWS_PLATFORM: u16 = 3;

// https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#windows-platform-platform-id--3
pub const WINDOWS_SYMBOL_ENCODING: u16 = 0;
pub const WINDOWS_BMP_ENCODING: u16 = 1;
pub const WINDOWS_FULL_REPERTOIRE_ENCODING: u16 = 10;

// https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#unicode-platform-platform-id--0
pub const UNICODE_BMP_ENCODING: u16 = 3;
pub const UNICODE_FULL_REPERTOIRE_ENCODING: u16 = 4;

/// The `(platform, encoding)` pairs consulted by [`Cmap::map_codepoint`],
/// most preferred first.
const UNICODE_PREFERENCE: &[(u16, u16)] = &[
    (WINDOWS_PLATFORM, WINDOWS_FULL_REPERTOIRE_ENCODING),
    (UNICODE_PLATFORM, 6),
    (UNICODE_PLATFORM, UNICODE_FULL_REPERTOIRE_ENCODING),
    (WINDOWS_PLATFORM, WINDOWS_BMP_ENCODING),
    (UNICODE_PLATFORM, UNICODE_BMP_ENCODING),
    (UNICODE_PLATFORM, 2),
    (UNICODE_PLATFORM, 1),
    (UNICODE_PLATFORM, 0),
    (WINDOWS_PLATFORM, WINDOWS_SYMBOL_ENCODING),
];

/// The [cmap] table.
///
/// [cmap]: https://docs.microsoft.com/en-us/typography/opentype/spec/cmap
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cmap {
    pub version: u16,
    pub encoding_records: Vec<EncodingRecord>,
}

/// A subtable, and the platform and encoding it applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodingRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub subtable: CmapSubtable,
}

/// The different cmap subtable formats.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CmapSubtable {
    Format0(Cmap0),
    Format4(Cmap4),
    Format6(Cmap6),
    Format12(Cmap12),
    Format13(Cmap13),
    /// A subtable in a format we do not interpret.
    Unknown(RawSubtable),
}

/// [Format 0]: byte encoding table
///
/// [Format 0]: https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-0-byte-encoding-table
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cmap0 {
    pub language: u16,
    /// Exactly 256 glyph ids, indexed by character code.
    pub glyph_id_array: Vec<u8>,
}

/// [Format 6]: trimmed table mapping
///
/// [Format 6]: https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-6-trimmed-table-mapping
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cmap6 {
    pub language: u16,
    pub first_code: u16,
    pub glyph_id_array: Vec<GlyphId16>,
}

/// [Format 12]: segmented coverage
///
/// [Format 12]: https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-12-segmented-coverage
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cmap12 {
    pub language: u32,
    pub groups: Vec<SequentialMapGroup>,
}

/// [Format 13]: many-to-one range mappings
///
/// [Format 13]: https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-13-many-to-one-range-mappings
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cmap13 {
    pub language: u32,
    pub groups: Vec<ConstantMapGroup>,
}

/// A range of codes mapped to consecutive glyphs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequentialMapGroup {
    pub start_char_code: u32,
    pub end_char_code: u32,
    pub start_glyph_id: u32,
}

/// A range of codes all mapped to the same glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstantMapGroup {
    pub start_char_code: u32,
    pub end_char_code: u32,
    pub glyph_id: u32,
}

/// The bytes of a subtable we do not interpret.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawSubtable {
    pub format: u16,
    /// The whole subtable, starting with the format field.
    pub data: Vec<u8>,
}

impl TopLevelTable for Cmap {
    const TAG: Tag = Tag::new(b"cmap");
}

impl Cmap {
    pub fn new(encoding_records: Vec<EncodingRecord>) -> Self {
        Cmap {
            version: 0,
            encoding_records,
        }
    }

    /// The subtable for this platform and encoding, if present.
    pub fn subtable(&self, platform_id: u16, encoding_id: u16) -> Option<&CmapSubtable> {
        self.encoding_records
            .iter()
            .find(|rec| rec.platform_id == platform_id && rec.encoding_id == encoding_id)
            .map(|rec| &rec.subtable)
    }

    /// Map a Unicode code point to a glyph, using the best available
    /// Unicode subtable.
    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId16> {
        UNICODE_PREFERENCE
            .iter()
            .filter_map(|(platform, encoding)| self.subtable(*platform, *encoding))
            .find_map(|subtable| subtable.map_codepoint(codepoint))
    }
}

impl EncodingRecord {
    pub fn new(platform_id: u16, encoding_id: u16, subtable: impl Into<CmapSubtable>) -> Self {
        EncodingRecord {
            platform_id,
            encoding_id,
            subtable: subtable.into(),
        }
    }
}

impl CmapSubtable {
    pub fn format(&self) -> u16 {
        match self {
            CmapSubtable::Format0(_) => 0,
            CmapSubtable::Format4(_) => 4,
            CmapSubtable::Format6(_) => 6,
            CmapSubtable::Format12(_) => 12,
            CmapSubtable::Format13(_) => 13,
            CmapSubtable::Unknown(raw) => raw.format,
        }
    }

    /// The glyph for this code, or `None` if it is unmapped (or maps to
    /// glyph 0).
    pub fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId16> {
        let gid = match self {
            CmapSubtable::Format0(table) => table.map_codepoint(codepoint),
            CmapSubtable::Format4(table) => u16::try_from(codepoint).ok().map(|c| table.gid(c)),
            CmapSubtable::Format6(table) => table.map_codepoint(codepoint),
            CmapSubtable::Format12(table) => table.map_codepoint(codepoint),
            CmapSubtable::Format13(table) => table.map_codepoint(codepoint),
            CmapSubtable::Unknown(_) => None,
        };
        gid.filter(|gid| *gid != GlyphId16::NOTDEF)
    }
}

impl Cmap0 {
    pub fn new(glyph_id_array: Vec<u8>) -> Self {
        Cmap0 {
            language: 0,
            glyph_id_array,
        }
    }

    fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId16> {
        self.glyph_id_array
            .get(codepoint as usize)
            .map(|gid| GlyphId16::new(*gid as u16))
    }
}

impl Default for Cmap0 {
    fn default() -> Self {
        Cmap0::new(vec![0; 256])
    }
}

impl Cmap6 {
    fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId16> {
        let idx = codepoint.checked_sub(self.first_code as u32)?;
        self.glyph_id_array.get(idx as usize).copied()
    }
}

impl Cmap12 {
    /// Build a subtable from `(codepoint, glyph)` pairs.
    ///
    /// Consecutive codes mapped to consecutive glyphs share a group. If a
    /// code appears more than once the last mapping wins.
    pub fn from_mappings(mappings: impl IntoIterator<Item = (u32, GlyphId16)>) -> Self {
        let map: HashMap<u32, GlyphId16> = mappings.into_iter().collect();
        let mut codes: Vec<u32> = map.keys().copied().collect();
        codes.sort_unstable();

        let mut groups: Vec<SequentialMapGroup> = Vec::new();
        for code in codes {
            let gid = map[&code].to_u16() as u32;
            match groups.last_mut() {
                Some(group)
                    if group.end_char_code.checked_add(1) == Some(code)
                        && group.start_glyph_id + (code - group.start_char_code) == gid =>
                {
                    group.end_char_code = code;
                }
                _ => groups.push(SequentialMapGroup {
                    start_char_code: code,
                    end_char_code: code,
                    start_glyph_id: gid,
                }),
            }
        }
        Cmap12 {
            language: 0,
            groups,
        }
    }

    fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId16> {
        let idx = self
            .groups
            .binary_search_by(|group| {
                if group.end_char_code < codepoint {
                    std::cmp::Ordering::Less
                } else if group.start_char_code > codepoint {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .ok()?;
        let group = &self.groups[idx];
        let gid = group.start_glyph_id + (codepoint - group.start_char_code);
        u16::try_from(gid).ok().map(GlyphId16::new)
    }
}

impl Cmap13 {
    fn map_codepoint(&self, codepoint: u32) -> Option<GlyphId16> {
        self.groups
            .iter()
            .find(|group| (group.start_char_code..=group.end_char_code).contains(&codepoint))
            .and_then(|group| u16::try_from(group.glyph_id).ok())
            .map(GlyphId16::new)
    }
}

impl RawSubtable {
    /// Read a subtable of unknown format, using the length field its format
    /// family would have.
    fn read(data: FontData<'_>, format: u16) -> Result<Self, ReadError> {
        let declared_len = match format {
            0..=6 => data.read_at::<u16>(2)? as usize,
            8 | 10 | 12 | 13 => data.read_at::<u32>(4)? as usize,
            14 => data.read_at::<u32>(2)? as usize,
            _ => data.len(),
        };
        let len = declared_len.min(data.len());
        Ok(RawSubtable {
            format,
            data: data.as_bytes()[..len].to_vec(),
        })
    }
}

impl FontRead for Cmap {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read()?;
        let num_tables: u16 = cursor.read()?;
        let mut encoding_records = Vec::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            let platform_id = cursor.read()?;
            let encoding_id = cursor.read()?;
            let offset: u32 = cursor.read()?;
            let subtable = CmapSubtable::read(data.offset_data(offset as usize)?)?;
            encoding_records.push(EncodingRecord {
                platform_id,
                encoding_id,
                subtable,
            });
        }
        Ok(Cmap {
            version,
            encoding_records,
        })
    }
}

impl FontRead for CmapSubtable {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            0 => Cmap0::read(data).map(Self::Format0),
            4 => Cmap4::read(data).map(Self::Format4),
            6 => Cmap6::read(data).map(Self::Format6),
            12 => Cmap12::read(data).map(Self::Format12),
            13 => Cmap13::read(data).map(Self::Format13),
            other => RawSubtable::read(data, other).map(Self::Unknown),
        }
    }
}

impl FontRead for Cmap0 {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let _length: u16 = cursor.read()?;
        let language = cursor.read()?;
        let glyph_id_array = cursor.read_bytes(256)?.to_vec();
        Ok(Cmap0 {
            language,
            glyph_id_array,
        })
    }
}

impl FontRead for Cmap6 {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let _length: u16 = cursor.read()?;
        let language = cursor.read()?;
        let first_code = cursor.read()?;
        let entry_count: u16 = cursor.read()?;
        let glyph_id_array = cursor.read_array(entry_count as usize)?;
        Ok(Cmap6 {
            language,
            first_code,
            glyph_id_array,
        })
    }
}

/// Read the header shared by formats 12 and 13, returning the language and
/// the group triples.
fn read_groups(data: FontData<'_>) -> Result<(u32, Vec<(u32, u32, u32)>), ReadError> {
    let mut cursor = data.cursor();
    let _format: u16 = cursor.read()?;
    let _reserved: u16 = cursor.read()?;
    let _length: u32 = cursor.read()?;
    let language = cursor.read()?;
    let num_groups: u32 = cursor.read()?;
    if cursor.remaining_len() / 12 < num_groups as usize {
        return Err(ReadError::OutOfBounds);
    }
    let groups = (0..num_groups)
        .map(|_| Ok((cursor.read()?, cursor.read()?, cursor.read()?)))
        .collect::<Result<_, ReadError>>()?;
    Ok((language, groups))
}

impl FontRead for Cmap12 {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let (language, groups) = read_groups(data)?;
        Ok(Cmap12 {
            language,
            groups: groups
                .into_iter()
                .map(|(start, end, gid)| SequentialMapGroup {
                    start_char_code: start,
                    end_char_code: end,
                    start_glyph_id: gid,
                })
                .collect(),
        })
    }
}

impl FontRead for Cmap13 {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let (language, groups) = read_groups(data)?;
        Ok(Cmap13 {
            language,
            groups: groups
                .into_iter()
                .map(|(start, end, gid)| ConstantMapGroup {
                    start_char_code: start,
                    end_char_code: end,
                    glyph_id: gid,
                })
                .collect(),
        })
    }
}

impl FontWrite for Cmap {
    fn write_into(&self, writer: &mut TableWriter) {
        self.version.write_into(writer);
        (self.encoding_records.len() as u16).write_into(writer);
        for record in &self.encoding_records {
            record.platform_id.write_into(writer);
            record.encoding_id.write_into(writer);
            // identical subtables are deduplicated by the writer
            writer.write_offset(&record.subtable, 4);
        }
    }
}

impl FontWrite for CmapSubtable {
    fn write_into(&self, writer: &mut TableWriter) {
        match self {
            CmapSubtable::Format0(table) => table.write_into(writer),
            CmapSubtable::Format4(table) => table.write_into(writer),
            CmapSubtable::Format6(table) => table.write_into(writer),
            CmapSubtable::Format12(table) => table.write_into(writer),
            CmapSubtable::Format13(table) => table.write_into(writer),
            CmapSubtable::Unknown(raw) => writer.write_slice(&raw.data),
        }
    }
}

impl FontWrite for Cmap0 {
    fn write_into(&self, writer: &mut TableWriter) {
        0u16.write_into(writer);
        (6 + self.glyph_id_array.len() as u16).write_into(writer);
        self.language.write_into(writer);
        writer.write_slice(&self.glyph_id_array);
    }
}

impl FontWrite for Cmap6 {
    fn write_into(&self, writer: &mut TableWriter) {
        let count = self.glyph_id_array.len() as u16;
        6u16.write_into(writer);
        (10 + 2 * count).write_into(writer);
        self.language.write_into(writer);
        self.first_code.write_into(writer);
        count.write_into(writer);
        self.glyph_id_array.write_into(writer);
    }
}

fn write_groups(
    writer: &mut TableWriter,
    format: u16,
    language: u32,
    groups: impl ExactSizeIterator<Item = (u32, u32, u32)>,
) {
    let num_groups = groups.len() as u32;
    format.write_into(writer);
    0u16.write_into(writer);
    (16 + 12 * num_groups).write_into(writer);
    language.write_into(writer);
    num_groups.write_into(writer);
    for (start, end, gid) in groups {
        [start, end, gid].write_into(writer);
    }
}

impl FontWrite for Cmap12 {
    fn write_into(&self, writer: &mut TableWriter) {
        let groups = self
            .groups
            .iter()
            .map(|g| (g.start_char_code, g.end_char_code, g.start_glyph_id));
        write_groups(writer, 12, self.language, groups)
    }
}

impl FontWrite for Cmap13 {
    fn write_into(&self, writer: &mut TableWriter) {
        let groups = self
            .groups
            .iter()
            .map(|g| (g.start_char_code, g.end_char_code, g.glyph_id));
        write_groups(writer, 13, self.language, groups)
    }
}

impl Validate for Cmap {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("cmap", |ctx| {
            if self.encoding_records.len() > u16::MAX as usize {
                ctx.report("too many encoding records");
            }
            ctx.in_field("encoding_records", |ctx| {
                ctx.in_array(&self.encoding_records, |ctx, record| {
                    record.subtable.validate_impl(ctx)
                })
            })
        })
    }
}

impl Validate for CmapSubtable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        match self {
            CmapSubtable::Format0(table) => {
                if table.glyph_id_array.len() != 256 {
                    ctx.report("format 0 subtable must have 256 glyph ids");
                }
            }
            CmapSubtable::Format4(table) => table.validate_impl(ctx),
            CmapSubtable::Format6(table) => {
                if 10 + 2 * table.glyph_id_array.len() > u16::MAX as usize {
                    ctx.report("format 6 subtable is too large");
                }
            }
            CmapSubtable::Format12(table) => validate_groups(
                ctx,
                table
                    .groups
                    .iter()
                    .map(|g| (g.start_char_code, g.end_char_code)),
            ),
            CmapSubtable::Format13(table) => validate_groups(
                ctx,
                table
                    .groups
                    .iter()
                    .map(|g| (g.start_char_code, g.end_char_code)),
            ),
            CmapSubtable::Unknown(_) => (),
        }
    }
}

fn validate_groups(ctx: &mut ValidationCtx, groups: impl Iterator<Item = (u32, u32)>) {
    let mut prev_end = None;
    for (start, end) in groups {
        if start > end {
            ctx.report(format!("group start {start} is after its end {end}"));
        }
        if prev_end.is_some_and(|prev| prev >= start) {
            ctx.report("groups must be sorted and must not overlap");
        }
        prev_end = Some(end);
    }
}

impl From<Cmap0> for CmapSubtable {
    fn from(src: Cmap0) -> CmapSubtable {
        CmapSubtable::Format0(src)
    }
}

impl From<Cmap4> for CmapSubtable {
    fn from(src: Cmap4) -> CmapSubtable {
        CmapSubtable::Format4(src)
    }
}

impl From<Cmap6> for CmapSubtable {
    fn from(src: Cmap6) -> CmapSubtable {
        CmapSubtable::Format6(src)
    }
}

impl From<Cmap12> for CmapSubtable {
    fn from(src: Cmap12) -> CmapSubtable {
        CmapSubtable::Format12(src)
    }
}

impl From<Cmap13> for CmapSubtable {
    fn from(src: Cmap13) -> CmapSubtable {
        CmapSubtable::Format13(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gid(raw: u16) -> GlyphId16 {
        GlyphId16::new(raw)
    }

    fn explicit_cmap() -> Cmap {
        let format4 = Cmap4 {
            language: 1,
            segments: vec![
                Segment::new([(1, gid(10)), (2, gid(20)), (3, gid(30))]),
                Segment::new([(4, gid(40)), (5, gid(50)), (6, gid(60))]),
            ],
        };
        Cmap::new(vec![EncodingRecord::new(3, 2, format4)])
    }

    #[test]
    fn encode_explicit_format4() {
        let dumped = crate::write::dump_table(&explicit_cmap()).unwrap();
        assert_eq!(dumped, font_test_data::cmap::CMAP_FORMAT4_EXPLICIT);
    }

    #[test]
    fn decode_explicit_format4() {
        let cmap = Cmap::read(FontData::new(font_test_data::cmap::CMAP_FORMAT4_EXPLICIT)).unwrap();
        assert_eq!(cmap, explicit_cmap());
        let CmapSubtable::Format4(format4) = &cmap.encoding_records[0].subtable else {
            panic!("expected format 4");
        };
        assert_eq!(format4.gid(1), gid(10));
        assert_eq!(format4.codes(gid(10)), [1]);
        assert_eq!(format4.gid(100), GlyphId16::NOTDEF);
        assert!(format4.codes(gid(100)).is_empty());
    }

    #[test]
    fn shared_subtables_are_written_once() {
        let format4 = Cmap4::from_glyphs(&[vec![], vec![], vec![0x41], vec![0x42]]);
        let cmap = Cmap::new(vec![
            EncodingRecord::new(UNICODE_PLATFORM, UNICODE_BMP_ENCODING, format4.clone()),
            EncodingRecord::new(WINDOWS_PLATFORM, WINDOWS_BMP_ENCODING, format4),
        ]);
        let dumped = crate::write::dump_table(&cmap).unwrap();
        let data = FontData::new(&dumped);
        let first: u32 = data.read_at(8).unwrap();
        let second: u32 = data.read_at(16).unwrap();
        assert_eq!(first, 20);
        assert_eq!(first, second);
        assert_eq!(Cmap::read(data).unwrap(), cmap);
    }

    #[test]
    fn all_formats_roundtrip() {
        let mut format0 = Cmap0::default();
        format0.glyph_id_array[0x41] = 3;
        let format6 = Cmap6 {
            language: 0,
            first_code: 0x30,
            glyph_id_array: vec![gid(5), gid(6), gid(0), gid(9)],
        };
        let format12 = Cmap12::from_mappings([
            (0x41, gid(2)),
            (0x42, gid(3)),
            (0x1F600, gid(4)),
        ]);
        let format13 = Cmap13 {
            language: 0,
            groups: vec![ConstantMapGroup {
                start_char_code: 0x10000,
                end_char_code: 0x10FFFF,
                glyph_id: 7,
            }],
        };
        let cmap = Cmap::new(vec![
            EncodingRecord::new(UNICODE_PLATFORM, UNICODE_FULL_REPERTOIRE_ENCODING, format12),
            EncodingRecord::new(UNICODE_PLATFORM, 6, format13),
            EncodingRecord::new(MACINTOSH_PLATFORM, 0, format0),
            EncodingRecord::new(WINDOWS_PLATFORM, WINDOWS_BMP_ENCODING, format6),
        ]);
        let dumped = crate::write::dump_table(&cmap).unwrap();
        let loaded = Cmap::read(FontData::new(&dumped)).unwrap();
        assert_eq!(loaded, cmap);

        let formats: Vec<_> = loaded
            .encoding_records
            .iter()
            .map(|rec| rec.subtable.format())
            .collect();
        assert_eq!(formats, [12, 13, 0, 6]);
    }

    #[test]
    fn format12_groups() {
        let table = Cmap12::from_mappings([
            (0x41, gid(2)),
            (0x42, gid(3)),
            (0x43, gid(4)),
            (0x45, gid(5)),
            (0x46, gid(9)),
            (0x1F600, gid(10)),
            // duplicate, last wins
            (0x1F600, gid(11)),
        ]);
        assert_eq!(
            table.groups,
            [
                SequentialMapGroup {
                    start_char_code: 0x41,
                    end_char_code: 0x43,
                    start_glyph_id: 2
                },
                SequentialMapGroup {
                    start_char_code: 0x45,
                    end_char_code: 0x45,
                    start_glyph_id: 5
                },
                SequentialMapGroup {
                    start_char_code: 0x46,
                    end_char_code: 0x46,
                    start_glyph_id: 9
                },
                SequentialMapGroup {
                    start_char_code: 0x1F600,
                    end_char_code: 0x1F600,
                    start_glyph_id: 11
                },
            ]
        );
        assert_eq!(table.map_codepoint(0x42), Some(gid(3)));
        assert_eq!(table.map_codepoint(0x44), None);
    }

    #[test]
    fn map_codepoint_prefers_full_repertoire() {
        let bmp = Cmap4::from_glyphs(&[vec![], vec![], vec![0x41]]);
        let full = Cmap12::from_mappings([(0x41, gid(7)), (0x1F600, gid(8))]);
        let cmap = Cmap::new(vec![
            EncodingRecord::new(WINDOWS_PLATFORM, WINDOWS_BMP_ENCODING, bmp),
            EncodingRecord::new(WINDOWS_PLATFORM, WINDOWS_FULL_REPERTOIRE_ENCODING, full),
        ]);
        assert_eq!(cmap.map_codepoint(0x41), Some(gid(7)));
        assert_eq!(cmap.map_codepoint(0x1F600), Some(gid(8)));
        assert_eq!(cmap.map_codepoint(0x42), None);
    }

    #[test]
    fn map_codepoint_falls_back_to_bmp() {
        let bmp = Cmap4::from_glyphs(&[vec![], vec![], vec![0x41]]);
        let cmap = Cmap::new(vec![EncodingRecord::new(
            WINDOWS_PLATFORM,
            WINDOWS_BMP_ENCODING,
            bmp,
        )]);
        assert_eq!(cmap.map_codepoint(0x41), Some(gid(2)));
        assert_eq!(cmap.map_codepoint(0x1F600), None);
    }

    #[test]
    fn unknown_format_is_preserved() {
        // a format 2 subtable header claiming 10 bytes
        let mut data = vec![0, 0, 0, 1, 0, 3, 0, 1, 0, 0, 0, 12];
        data.extend_from_slice(&[0, 2, 0, 10, 0, 0, 1, 2, 3, 4]);
        let cmap = Cmap::read(FontData::new(&data)).unwrap();
        assert_eq!(
            cmap.encoding_records[0].subtable,
            CmapSubtable::Unknown(RawSubtable {
                format: 2,
                data: data[12..].to_vec()
            })
        );
        assert_eq!(crate::write::dump_table(&cmap).unwrap(), data);
    }

    #[test]
    fn bad_offset() {
        let data = [0, 0, 0, 1, 0, 3, 0, 1, 0, 0, 0x10, 0];
        assert_eq!(
            Cmap::read(FontData::new(&data)),
            Err(ReadError::OutOfBounds)
        );
    }
}
