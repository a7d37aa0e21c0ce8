//! The [kern](https://docs.microsoft.com/en-us/typography/opentype/spec/kern) table

use font_types::{GlyphId16, Tag};

use crate::{
    font_data::{Cursor, FontData},
    read::{FontRead, ReadError},
    tables::TopLevelTable,
    util::SearchRange,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

const KERN_PAIR_LEN: usize = 6;
const APPLE_VERSION: u32 = 0x00010000;

/// The [kern] table, in either the OpenType or the Apple layout.
///
/// [kern]: https://docs.microsoft.com/en-us/typography/opentype/spec/kern
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kern {
    pub format: KernFormat,
    pub subtables: Vec<KernSubtable>,
}

/// Which of the two incompatible table headers is used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KernFormat {
    /// Version 0: 16-bit header fields, format in the high byte of coverage.
    #[default]
    OpenType,
    /// Version 1.0: 32-bit header fields, format in the low byte of coverage.
    Apple,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KernSubtable {
    /// The subtable version (OpenType) or tuple index (Apple).
    pub version: u16,
    /// Coverage bits, including the subtable format.
    pub coverage: u16,
    pub data: KernSubtableData,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KernSubtableData {
    Format0(Kern0),
    /// A subtable format we do not interpret; the bytes after the header.
    Other { format: u8, data: Vec<u8> },
}

/// A sorted list of kerning pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kern0 {
    pub pairs: Vec<KernPair>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KernPair {
    pub left: GlyphId16,
    pub right: GlyphId16,
    pub value: i16,
}

impl TopLevelTable for Kern {
    const TAG: Tag = Tag::new(b"kern");
}

impl KernFormat {
    fn subtable_header_len(self) -> usize {
        match self {
            KernFormat::OpenType => 6,
            KernFormat::Apple => 8,
        }
    }

    fn format_from_coverage(self, coverage: u16) -> u8 {
        match self {
            KernFormat::OpenType => (coverage >> 8) as u8,
            KernFormat::Apple => (coverage & 0xFF) as u8,
        }
    }
}

impl Kern {
    pub fn new(subtables: Vec<KernSubtable>) -> Self {
        Kern {
            format: KernFormat::OpenType,
            subtables,
        }
    }

    /// The combined adjustment for a pair, from every format 0 subtable that
    /// lists it.
    pub fn kerning(&self, left: GlyphId16, right: GlyphId16) -> Option<i32> {
        self.subtables
            .iter()
            .filter_map(|sub| match &sub.data {
                KernSubtableData::Format0(kern0) => kern0.kerning(left, right),
                KernSubtableData::Other { .. } => None,
            })
            .fold(None, |acc, value| Some(acc.unwrap_or(0) + value as i32))
    }
}

impl KernSubtable {
    /// A horizontal format 0 subtable in the OpenType layout.
    pub fn horizontal(pairs: Vec<KernPair>) -> Self {
        KernSubtable {
            version: 0,
            coverage: 0x0001,
            data: KernSubtableData::Format0(Kern0 { pairs }),
        }
    }

    fn data_len(&self) -> usize {
        match &self.data {
            KernSubtableData::Format0(kern0) => 8 + kern0.pairs.len() * KERN_PAIR_LEN,
            KernSubtableData::Other { data, .. } => data.len(),
        }
    }

    fn read_from(cursor: &mut Cursor<'_>, format: KernFormat) -> Result<Self, ReadError> {
        let (version, length, coverage) = match format {
            KernFormat::OpenType => {
                let version = cursor.read()?;
                let length = cursor.read::<u16>()? as usize;
                let coverage = cursor.read()?;
                (version, length, coverage)
            }
            KernFormat::Apple => {
                let length = cursor.read::<u32>()? as usize;
                let coverage = cursor.read()?;
                let tuple_index = cursor.read()?;
                (tuple_index, length, coverage)
            }
        };
        let data = match format.format_from_coverage(coverage) {
            0 => KernSubtableData::Format0(Kern0::read_from(cursor)?),
            other => {
                let data_len = length
                    .checked_sub(format.subtable_header_len())
                    .ok_or(ReadError::MalformedData("kern subtable length too small"))?;
                KernSubtableData::Other {
                    format: other,
                    data: cursor.read_bytes(data_len)?.to_vec(),
                }
            }
        };
        Ok(KernSubtable {
            version,
            coverage,
            data,
        })
    }
}

impl Kern0 {
    pub fn kerning(&self, left: GlyphId16, right: GlyphId16) -> Option<i16> {
        self.pairs
            .binary_search_by_key(&(left, right), |pair| (pair.left, pair.right))
            .ok()
            .map(|idx| self.pairs[idx].value)
    }

    // the declared length overflows for large OpenType subtables, so the
    // pair count is what determines the size
    fn read_from(cursor: &mut Cursor<'_>) -> Result<Self, ReadError> {
        let n_pairs: u16 = cursor.read()?;
        // searchRange, entrySelector, rangeShift
        cursor.advance_by(6)?;
        if cursor.remaining_len() / KERN_PAIR_LEN < n_pairs as usize {
            return Err(ReadError::OutOfBounds);
        }
        let pairs = (0..n_pairs)
            .map(|_| {
                Ok(KernPair {
                    left: cursor.read()?,
                    right: cursor.read()?,
                    value: cursor.read()?,
                })
            })
            .collect::<Result<_, ReadError>>()?;
        Ok(Kern0 { pairs })
    }
}

impl KernPair {
    pub fn new(left: u16, right: u16, value: i16) -> Self {
        KernPair {
            left: GlyphId16::new(left),
            right: GlyphId16::new(right),
            value,
        }
    }
}

impl FontRead for Kern {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let (format, n_tables) = match data.read_at::<u16>(0)? {
            0 => {
                cursor.advance_by(2)?;
                (KernFormat::OpenType, cursor.read::<u16>()? as u32)
            }
            1 => {
                let version: u32 = cursor.read()?;
                if version != APPLE_VERSION {
                    return Err(ReadError::InvalidFormat(version as _));
                }
                (KernFormat::Apple, cursor.read::<u32>()?)
            }
            other => return Err(ReadError::InvalidFormat(other as _)),
        };
        let subtables = (0..n_tables)
            .map(|_| KernSubtable::read_from(&mut cursor, format))
            .collect::<Result<_, _>>()?;
        Ok(Kern { format, subtables })
    }
}

impl FontWrite for Kern {
    fn write_into(&self, writer: &mut TableWriter) {
        match self.format {
            KernFormat::OpenType => {
                0u16.write_into(writer);
                (self.subtables.len() as u16).write_into(writer);
            }
            KernFormat::Apple => {
                APPLE_VERSION.write_into(writer);
                (self.subtables.len() as u32).write_into(writer);
            }
        }
        for subtable in &self.subtables {
            let length = self.format.subtable_header_len() + subtable.data_len();
            match self.format {
                KernFormat::OpenType => {
                    subtable.version.write_into(writer);
                    if length > u16::MAX as usize {
                        log::warn!("kern subtable length {length} overflows its 16-bit field");
                    }
                    (length as u16).write_into(writer);
                    subtable.coverage.write_into(writer);
                }
                KernFormat::Apple => {
                    (length as u32).write_into(writer);
                    subtable.coverage.write_into(writer);
                    subtable.version.write_into(writer);
                }
            }
            subtable.data.write_into(writer);
        }
    }
}

impl FontWrite for KernSubtableData {
    fn write_into(&self, writer: &mut TableWriter) {
        match self {
            KernSubtableData::Format0(kern0) => kern0.write_into(writer),
            KernSubtableData::Other { data, .. } => writer.write_slice(data),
        }
    }
}

impl FontWrite for Kern0 {
    fn write_into(&self, writer: &mut TableWriter) {
        let computed = SearchRange::compute(self.pairs.len(), KERN_PAIR_LEN);
        (self.pairs.len() as u16).write_into(writer);
        computed.search_range.write_into(writer);
        computed.entry_selector.write_into(writer);
        computed.range_shift.write_into(writer);
        for pair in &self.pairs {
            pair.left.write_into(writer);
            pair.right.write_into(writer);
            pair.value.write_into(writer);
        }
    }
}

impl Validate for Kern {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("kern", |ctx| {
            ctx.in_field("subtables", |ctx| {
                ctx.in_array(&self.subtables, |ctx, subtable| {
                    let declared = match &subtable.data {
                        KernSubtableData::Format0(_) => 0,
                        KernSubtableData::Other { format, .. } => *format,
                    };
                    if self.format.format_from_coverage(subtable.coverage) != declared {
                        ctx.report("coverage does not match the subtable format");
                    }
                    if let KernSubtableData::Format0(kern0) = &subtable.data {
                        if kern0.pairs.len() > u16::MAX as usize {
                            ctx.report("too many kerning pairs");
                        }
                        let sorted = kern0
                            .pairs
                            .windows(2)
                            .all(|p| (p[0].left, p[0].right) < (p[1].left, p[1].right));
                        if !sorted {
                            ctx.report("kerning pairs must be sorted and unique");
                        }
                    }
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn smoke_pairs() -> Vec<KernPair> {
        vec![
            KernPair::new(4, 12, -40),
            KernPair::new(4, 28, 40),
            KernPair::new(5, 40, -50),
        ]
    }

    #[test]
    fn smoke_test() {
        let kern = Kern::new(vec![KernSubtable::horizontal(smoke_pairs())]);
        let bytes = crate::write::dump_table(&kern).unwrap();
        assert_eq!(bytes, font_test_data::kern::KERN_VER_0_FMT_0_DATA);
    }

    #[test]
    fn decode_ot() {
        let kern = Kern::read(FontData::new(font_test_data::kern::KERN_VER_0_FMT_0_DATA)).unwrap();
        assert_eq!(kern.format, KernFormat::OpenType);
        assert_eq!(kern, Kern::new(vec![KernSubtable::horizontal(smoke_pairs())]));
        assert_eq!(
            kern.kerning(GlyphId16::new(4), GlyphId16::new(28)),
            Some(40)
        );
        assert_eq!(kern.kerning(GlyphId16::new(4), GlyphId16::new(5)), None);
    }

    #[test]
    fn apple_roundtrip() {
        let kern = Kern {
            format: KernFormat::Apple,
            subtables: vec![
                KernSubtable {
                    version: 0,
                    coverage: 0x0000,
                    data: KernSubtableData::Format0(Kern0 {
                        pairs: smoke_pairs(),
                    }),
                },
                KernSubtable {
                    version: 0,
                    coverage: 0x0002,
                    data: KernSubtableData::Other {
                        format: 2,
                        data: vec![0, 6, 0, 1, 2, 3],
                    },
                },
            ],
        };
        let bytes = crate::write::dump_table(&kern).unwrap();
        assert_eq!(&bytes[..4], &[0, 1, 0, 0]);
        // header, then 8 + 8 + 18 and 8 + 6
        assert_eq!(bytes.len(), 8 + 34 + 14);
        assert_eq!(Kern::read(FontData::new(&bytes)).unwrap(), kern);
    }

    #[test]
    fn multiple_subtables_sum() {
        let kern = Kern::new(vec![
            KernSubtable::horizontal(smoke_pairs()),
            KernSubtable::horizontal(vec![KernPair::new(4, 12, -10)]),
        ]);
        assert_eq!(
            kern.kerning(GlyphId16::new(4), GlyphId16::new(12)),
            Some(-50)
        );
    }

    #[test]
    fn unsorted_pairs() {
        let mut pairs = smoke_pairs();
        pairs.reverse();
        let kern = Kern::new(vec![KernSubtable::horizontal(pairs)]);
        assert!(crate::write::dump_table(&kern).is_err());
    }

    #[test]
    fn truncated_pairs() {
        let data = font_test_data::kern::KERN_VER_0_FMT_0_DATA;
        assert_eq!(
            Kern::read(FontData::new(&data[..data.len() - 3])),
            Err(ReadError::OutOfBounds)
        );
    }
}
