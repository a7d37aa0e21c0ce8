//! Common [layout] structures shared by `GDEF` and friends.
//!
//! [layout]: https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2

use std::collections::{BTreeMap, HashSet};

use font_types::GlyphId16;

use crate::{
    font_data::{Cursor, FontData},
    read::{FontRead, ReadError},
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

/// A [Coverage table](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-table)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoverageTable {
    Format1(CoverageFormat1),
    Format2(CoverageFormat2),
}

/// A sorted list of individual glyphs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverageFormat1 {
    pub glyph_array: Vec<GlyphId16>,
}

/// A sorted list of glyph ranges.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverageFormat2 {
    pub range_records: Vec<RangeRecord>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeRecord {
    pub start_glyph_id: GlyphId16,
    pub end_glyph_id: GlyphId16,
    /// The coverage index of `start_glyph_id`.
    pub start_coverage_index: u16,
}

/// A [Class Definition table](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClassDef {
    Format1(ClassDefFormat1),
    Format2(ClassDefFormat2),
}

/// Classes for a contiguous run of glyphs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDefFormat1 {
    pub start_glyph_id: GlyphId16,
    pub class_value_array: Vec<u16>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDefFormat2 {
    pub class_range_records: Vec<ClassRangeRecord>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassRangeRecord {
    pub start_glyph_id: GlyphId16,
    pub end_glyph_id: GlyphId16,
    pub class: u16,
}

/// A device table, or (in variable fonts) an index into the variation store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceOrVariationIndex {
    Device(Device),
    VariationIndex(VariationIndex),
}

/// Per-ppem adjustments, packed into 2, 4 or 8 bit signed values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Device {
    pub start_size: u16,
    pub end_size: u16,
    pub delta_format: DeltaFormat,
    pub delta_value: Vec<u16>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariationIndex {
    pub delta_set_outer_index: u16,
    pub delta_set_inner_index: u16,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum DeltaFormat {
    #[default]
    Local2BitDeltas = 1,
    Local4BitDeltas = 2,
    Local8BitDeltas = 3,
}

const VARIATION_INDEX_FORMAT: u16 = 0x8000;

impl DeltaFormat {
    fn new(raw: u16) -> Option<Self> {
        match raw {
            1 => Some(Self::Local2BitDeltas),
            2 => Some(Self::Local4BitDeltas),
            3 => Some(Self::Local8BitDeltas),
            _ => None,
        }
    }

    fn bits(self) -> usize {
        match self {
            Self::Local2BitDeltas => 2,
            Self::Local4BitDeltas => 4,
            Self::Local8BitDeltas => 8,
        }
    }
}

impl CoverageFormat1 {
    fn iter(&self) -> impl Iterator<Item = GlyphId16> + '_ {
        self.glyph_array.iter().copied()
    }

    fn len(&self) -> usize {
        self.glyph_array.len()
    }
}

impl CoverageFormat2 {
    fn iter(&self) -> impl Iterator<Item = GlyphId16> + '_ {
        self.range_records
            .iter()
            .flat_map(|rcd| iter_gids(rcd.start_glyph_id, rcd.end_glyph_id))
    }

    fn len(&self) -> usize {
        self.range_records
            .iter()
            .map(|rcd| {
                rcd.end_glyph_id
                    .to_u16()
                    .saturating_sub(rcd.start_glyph_id.to_u16()) as usize
                    + 1
            })
            .sum()
    }
}

impl CoverageTable {
    pub fn iter(&self) -> impl Iterator<Item = GlyphId16> + '_ {
        let (one, two) = match self {
            Self::Format1(table) => (Some(table.iter()), None),
            Self::Format2(table) => (None, Some(table.iter())),
        };

        one.into_iter().flatten().chain(two.into_iter().flatten())
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Format1(table) => table.len(),
            Self::Format2(table) => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The coverage index of `glyph`, if it is covered.
    pub fn get(&self, glyph: GlyphId16) -> Option<u16> {
        match self {
            Self::Format1(table) => table
                .glyph_array
                .binary_search(&glyph)
                .ok()
                .map(|idx| idx as u16),
            Self::Format2(table) => table.range_records.iter().find_map(|rcd| {
                (rcd.start_glyph_id <= glyph && glyph <= rcd.end_glyph_id).then(|| {
                    rcd.start_coverage_index + (glyph.to_u16() - rcd.start_glyph_id.to_u16())
                })
            }),
        }
    }
}

impl ClassDefFormat1 {
    fn iter(&self) -> impl Iterator<Item = (GlyphId16, u16)> + '_ {
        self.class_value_array.iter().enumerate().map(|(i, cls)| {
            (
                GlyphId16::new(self.start_glyph_id.to_u16().saturating_add(i as u16)),
                *cls,
            )
        })
    }
}

impl ClassRangeRecord {
    fn validate_glyph_range(&self, ctx: &mut ValidationCtx) {
        if self.start_glyph_id > self.end_glyph_id {
            ctx.report(format!(
                "start_glyph_id {} larger than end_glyph_id {}",
                self.start_glyph_id, self.end_glyph_id
            ));
        }
    }
}

impl ClassDefFormat2 {
    fn iter(&self) -> impl Iterator<Item = (GlyphId16, u16)> + '_ {
        self.class_range_records.iter().flat_map(|rcd| {
            (rcd.start_glyph_id.to_u16()..=rcd.end_glyph_id.to_u16())
                .map(|gid| (GlyphId16::new(gid), rcd.class))
        })
    }
}

impl ClassDef {
    pub fn iter(&self) -> impl Iterator<Item = (GlyphId16, u16)> + '_ {
        let (one, two) = match self {
            Self::Format1(table) => (Some(table.iter()), None),
            Self::Format2(table) => (None, Some(table.iter())),
        };

        one.into_iter().flatten().chain(two.into_iter().flatten())
    }

    /// Return the glyph class for the provided glyph.
    ///
    /// Glyphs which have not been assigned a class are given class 0
    pub fn get(&self, glyph: GlyphId16) -> u16 {
        self.get_raw(glyph).unwrap_or(0)
    }

    fn get_raw(&self, glyph: GlyphId16) -> Option<u16> {
        match self {
            ClassDef::Format1(table) => glyph
                .to_u16()
                .checked_sub(table.start_glyph_id.to_u16())
                .and_then(|idx| table.class_value_array.get(idx as usize))
                .copied(),
            ClassDef::Format2(table) => table.class_range_records.iter().find_map(|rec| {
                (rec.start_glyph_id <= glyph && glyph <= rec.end_glyph_id).then_some(rec.class)
            }),
        }
    }

    /// The number of distinct classes, including class 0.
    pub fn class_count(&self) -> u16 {
        self.iter()
            .map(|(_gid, cls)| cls)
            .chain(std::iter::once(0))
            .collect::<HashSet<_>>()
            .len() as u16
    }
}

/// A builder for [ClassDef] tables.
///
/// This will choose the smaller format for the included glyphs.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ClassDefBuilder {
    pub items: BTreeMap<GlyphId16, u16>,
}

/// A builder for [CoverageTable] tables.
///
/// This will choose the smaller format for the included glyphs.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CoverageTableBuilder {
    // invariant: is always sorted
    glyphs: Vec<GlyphId16>,
}

impl FromIterator<GlyphId16> for CoverageTableBuilder {
    fn from_iter<T: IntoIterator<Item = GlyphId16>>(iter: T) -> Self {
        let glyphs = iter.into_iter().collect::<Vec<_>>();
        CoverageTableBuilder::from_glyphs(glyphs)
    }
}

impl FromIterator<GlyphId16> for CoverageTable {
    fn from_iter<T: IntoIterator<Item = GlyphId16>>(iter: T) -> Self {
        let glyphs = iter.into_iter().collect::<Vec<_>>();
        CoverageTableBuilder::from_glyphs(glyphs).build()
    }
}

impl CoverageTableBuilder {
    /// Create a new builder from a vec of `GlyphId16`.
    pub fn from_glyphs(mut glyphs: Vec<GlyphId16>) -> Self {
        glyphs.sort_unstable();
        glyphs.dedup();
        CoverageTableBuilder { glyphs }
    }

    /// Add a glyph, returning its coverage index.
    ///
    /// If the glyph already exists, this returns its current index.
    pub fn add(&mut self, glyph: GlyphId16) -> u16 {
        match self.glyphs.binary_search(&glyph) {
            Ok(ix) => ix as u16,
            Err(ix) => {
                self.glyphs.insert(ix, glyph);
                ix as u16
            }
        }
    }

    /// Convert this builder into the appropriate [CoverageTable] variant.
    pub fn build(self) -> CoverageTable {
        if should_choose_coverage_format_2(&self.glyphs) {
            CoverageTable::Format2(CoverageFormat2 {
                range_records: RangeRecord::iter_for_glyphs(&self.glyphs).collect(),
            })
        } else {
            CoverageTable::Format1(CoverageFormat1 {
                glyph_array: self.glyphs,
            })
        }
    }
}

impl FromIterator<(GlyphId16, u16)> for ClassDefBuilder {
    fn from_iter<T: IntoIterator<Item = (GlyphId16, u16)>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().filter(|(_, cls)| *cls != 0).collect(),
        }
    }
}

impl ClassDefBuilder {
    fn prefer_format_1(&self) -> bool {
        let first = self.items.keys().next().map(|g| g.to_u16());
        let last = self.items.keys().next_back().map(|g| g.to_u16());
        // format 1: format, start, count, then one value per glyph in the span
        let len_format1 =
            6 + 2 * (1 + last.unwrap_or_default() - first.unwrap_or_default()) as usize;
        let len_format2 = 4 + iter_class_ranges(&self.items).count() * 6;

        len_format1 < len_format2
    }

    pub fn build(&self) -> ClassDef {
        if self.items.is_empty() {
            return ClassDef::Format2(ClassDefFormat2::default());
        }
        if self.prefer_format_1() {
            let first = self.items.keys().next().map(|g| g.to_u16()).unwrap_or(0);
            let last = self.items.keys().next_back().map(|g| g.to_u16());
            let class_value_array = (first..=last.unwrap_or_default())
                .map(|g| self.items.get(&GlyphId16::new(g)).copied().unwrap_or(0))
                .collect();
            ClassDef::Format1(ClassDefFormat1 {
                start_glyph_id: GlyphId16::new(first),
                class_value_array,
            })
        } else {
            ClassDef::Format2(ClassDefFormat2 {
                class_range_records: iter_class_ranges(&self.items).collect(),
            })
        }
    }
}

fn iter_class_ranges(
    values: &BTreeMap<GlyphId16, u16>,
) -> impl Iterator<Item = ClassRangeRecord> + '_ {
    let mut iter = values.iter();
    let mut prev = None;

    #[allow(clippy::while_let_on_iterator)]
    std::iter::from_fn(move || {
        while let Some((gid, class)) = iter.next() {
            match prev.take() {
                None => prev = Some((*gid, *gid, *class)),
                Some((start, end, pclass)) if are_sequential(end, *gid) && pclass == *class => {
                    prev = Some((start, *gid, pclass))
                }
                Some((start_glyph_id, end_glyph_id, pclass)) => {
                    prev = Some((*gid, *gid, *class));
                    return Some(ClassRangeRecord {
                        start_glyph_id,
                        end_glyph_id,
                        class: pclass,
                    });
                }
            }
        }
        prev.take()
            .map(|(start_glyph_id, end_glyph_id, class)| ClassRangeRecord {
                start_glyph_id,
                end_glyph_id,
                class,
            })
    })
}

fn should_choose_coverage_format_2(glyphs: &[GlyphId16]) -> bool {
    let format2_len = 4 + RangeRecord::iter_for_glyphs(glyphs).count() * 6;
    let format1_len = 4 + glyphs.len() * 2;
    format2_len < format1_len
}

impl RangeRecord {
    /// An iterator over records for this array of glyphs.
    ///
    /// # Note
    ///
    /// this function expects that glyphs are already sorted.
    pub fn iter_for_glyphs(glyphs: &[GlyphId16]) -> impl Iterator<Item = RangeRecord> + '_ {
        let mut cur_range = glyphs.first().copied().map(|g| (g, g));
        let mut len = 0u16;
        let mut iter = glyphs.iter().skip(1).copied();

        #[allow(clippy::while_let_on_iterator)]
        std::iter::from_fn(move || {
            while let Some(glyph) = iter.next() {
                match cur_range {
                    None => return None,
                    Some((a, b)) if are_sequential(b, glyph) => cur_range = Some((a, glyph)),
                    Some((a, b)) => {
                        let result = RangeRecord {
                            start_glyph_id: a,
                            end_glyph_id: b,
                            start_coverage_index: len,
                        };
                        cur_range = Some((glyph, glyph));
                        len += 1 + b.to_u16().saturating_sub(a.to_u16());
                        return Some(result);
                    }
                }
            }
            cur_range
                .take()
                .map(|(start_glyph_id, end_glyph_id)| RangeRecord {
                    start_glyph_id,
                    end_glyph_id,
                    start_coverage_index: len,
                })
        })
    }
}

fn iter_gids(gid1: GlyphId16, gid2: GlyphId16) -> impl Iterator<Item = GlyphId16> {
    (gid1.to_u16()..=gid2.to_u16()).map(GlyphId16::new)
}

fn are_sequential(gid1: GlyphId16, gid2: GlyphId16) -> bool {
    gid2.to_u16().saturating_sub(gid1.to_u16()) == 1
}

impl Device {
    /// Pack `values`, one per size in `start_size..=end_size`, in the
    /// narrowest format that holds them all.
    pub fn new(start_size: u16, end_size: u16, values: &[i8]) -> Self {
        debug_assert_eq!(
            (start_size..=end_size).count(),
            values.len(),
            "device range and values must match"
        );
        let delta_format: DeltaFormat = values
            .iter()
            .map(|val| match val {
                -2..=1 => DeltaFormat::Local2BitDeltas,
                -8..=7 => DeltaFormat::Local4BitDeltas,
                _ => DeltaFormat::Local8BitDeltas,
            })
            .max()
            .unwrap_or_default();
        let delta_value = encode_delta(delta_format, values);

        Device {
            start_size,
            end_size,
            delta_format,
            delta_value,
        }
    }

    /// The unpacked adjustment for each size in the range.
    pub fn values(&self) -> Vec<i8> {
        let bits = self.delta_format.bits();
        let per_word = 16 / bits;
        let count = self.size_count();
        (0..count)
            .map(|i| {
                let word = self.delta_value.get(i / per_word).copied().unwrap_or(0);
                let shift = 16 - bits * (i % per_word + 1);
                let raw = ((word >> shift) as u8) & (0xFFu16 >> (8 - bits)) as u8;
                // sign-extend from `bits`
                ((raw << (8 - bits)) as i8) >> (8 - bits)
            })
            .collect()
    }

    fn size_count(&self) -> usize {
        (self.end_size as usize + 1).saturating_sub(self.start_size as usize)
    }

    fn expected_words(&self) -> usize {
        let per_word = 16 / self.delta_format.bits();
        self.size_count().div_ceil(per_word)
    }
}

fn encode_delta(format: DeltaFormat, values: &[i8]) -> Vec<u16> {
    let (chunk_size, mask, bits) = match format {
        DeltaFormat::Local2BitDeltas => (8, 0b11, 2),
        DeltaFormat::Local4BitDeltas => (4, 0b1111, 4),
        DeltaFormat::Local8BitDeltas => (2, 0b11111111, 8),
    };
    values
        .chunks(chunk_size)
        .map(|chunk| encode_chunk(chunk, mask, bits))
        .collect()
}

fn encode_chunk(chunk: &[i8], mask: u8, bits: usize) -> u16 {
    let mut out = 0u16;
    for (i, val) in chunk.iter().enumerate() {
        out |= ((val.to_be_bytes()[0] & mask) as u16) << ((16 - bits) - i * bits);
    }
    out
}

impl From<Device> for DeviceOrVariationIndex {
    fn from(src: Device) -> Self {
        DeviceOrVariationIndex::Device(src)
    }
}

impl From<VariationIndex> for DeviceOrVariationIndex {
    fn from(src: VariationIndex) -> Self {
        DeviceOrVariationIndex::VariationIndex(src)
    }
}

impl FontRead for CoverageTable {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        let count: u16 = cursor.read()?;
        match format {
            1 => Ok(CoverageTable::Format1(CoverageFormat1 {
                glyph_array: cursor.read_array(count as usize)?,
            })),
            2 => {
                let range_records = (0..count)
                    .map(|_| {
                        Ok(RangeRecord {
                            start_glyph_id: cursor.read()?,
                            end_glyph_id: cursor.read()?,
                            start_coverage_index: cursor.read()?,
                        })
                    })
                    .collect::<Result<_, ReadError>>()?;
                Ok(CoverageTable::Format2(CoverageFormat2 { range_records }))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl FontWrite for CoverageTable {
    fn write_into(&self, writer: &mut TableWriter) {
        match self {
            CoverageTable::Format1(table) => {
                1u16.write_into(writer);
                (table.glyph_array.len() as u16).write_into(writer);
                table.glyph_array.write_into(writer);
            }
            CoverageTable::Format2(table) => {
                2u16.write_into(writer);
                (table.range_records.len() as u16).write_into(writer);
                for rcd in &table.range_records {
                    rcd.start_glyph_id.write_into(writer);
                    rcd.end_glyph_id.write_into(writer);
                    rcd.start_coverage_index.write_into(writer);
                }
            }
        }
    }
}

impl Validate for CoverageTable {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        match self {
            CoverageTable::Format1(table) => ctx.in_field("glyph_array", |ctx| {
                if table.glyph_array.len() > u16::MAX as usize {
                    ctx.report("array exceeds max length");
                }
                if table.glyph_array.windows(2).any(|pair| pair[0] >= pair[1]) {
                    ctx.report("glyphs must be sorted and unique");
                }
            }),
            CoverageTable::Format2(table) => ctx.in_field("range_records", |ctx| {
                if table.range_records.len() > u16::MAX as usize {
                    ctx.report("array exceeds max length");
                }
                ctx.in_array(&table.range_records, |ctx, rcd| {
                    if rcd.start_glyph_id > rcd.end_glyph_id {
                        ctx.report(format!(
                            "start_glyph_id {} larger than end_glyph_id {}",
                            rcd.start_glyph_id, rcd.end_glyph_id
                        ));
                    }
                });
            }),
        }
    }
}

impl FontRead for ClassDef {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        match cursor.read::<u16>()? {
            1 => {
                let start_glyph_id = cursor.read()?;
                let count: u16 = cursor.read()?;
                Ok(ClassDef::Format1(ClassDefFormat1 {
                    start_glyph_id,
                    class_value_array: cursor.read_array(count as usize)?,
                }))
            }
            2 => {
                let count: u16 = cursor.read()?;
                let class_range_records = (0..count)
                    .map(|_| {
                        Ok(ClassRangeRecord {
                            start_glyph_id: cursor.read()?,
                            end_glyph_id: cursor.read()?,
                            class: cursor.read()?,
                        })
                    })
                    .collect::<Result<_, ReadError>>()?;
                Ok(ClassDef::Format2(ClassDefFormat2 {
                    class_range_records,
                }))
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl FontWrite for ClassDef {
    fn write_into(&self, writer: &mut TableWriter) {
        match self {
            ClassDef::Format1(table) => {
                1u16.write_into(writer);
                table.start_glyph_id.write_into(writer);
                (table.class_value_array.len() as u16).write_into(writer);
                table.class_value_array.write_into(writer);
            }
            ClassDef::Format2(table) => {
                2u16.write_into(writer);
                (table.class_range_records.len() as u16).write_into(writer);
                for rcd in &table.class_range_records {
                    rcd.start_glyph_id.write_into(writer);
                    rcd.end_glyph_id.write_into(writer);
                    rcd.class.write_into(writer);
                }
            }
        }
    }
}

impl Validate for ClassDef {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        match self {
            ClassDef::Format1(table) => ctx.in_field("class_value_array", |ctx| {
                let end = table.start_glyph_id.to_u16() as usize + table.class_value_array.len();
                if end > u16::MAX as usize + 1 {
                    ctx.report("class values extend past the last glyph id");
                }
            }),
            ClassDef::Format2(table) => ctx.in_field("class_range_records", |ctx| {
                if table.class_range_records.len() > u16::MAX as usize {
                    ctx.report("array exceeds max length");
                }
                ctx.in_array(&table.class_range_records, |ctx, rcd| {
                    rcd.validate_glyph_range(ctx)
                });
            }),
        }
    }
}

impl DeviceOrVariationIndex {
    pub(crate) fn read_from(cursor: &mut Cursor<'_>) -> Result<Self, ReadError> {
        let first: u16 = cursor.read()?;
        let second: u16 = cursor.read()?;
        let format: u16 = cursor.read()?;
        if format == VARIATION_INDEX_FORMAT {
            return Ok(DeviceOrVariationIndex::VariationIndex(VariationIndex {
                delta_set_outer_index: first,
                delta_set_inner_index: second,
            }));
        }
        let delta_format = DeltaFormat::new(format).ok_or(ReadError::InvalidFormat(format.into()))?;
        let mut device = Device {
            start_size: first,
            end_size: second,
            delta_format,
            delta_value: Vec::new(),
        };
        device.delta_value = cursor.read_array(device.expected_words())?;
        Ok(DeviceOrVariationIndex::Device(device))
    }
}

impl FontRead for DeviceOrVariationIndex {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        Self::read_from(&mut data.cursor())
    }
}

impl FontWrite for DeviceOrVariationIndex {
    fn write_into(&self, writer: &mut TableWriter) {
        match self {
            DeviceOrVariationIndex::Device(device) => {
                device.start_size.write_into(writer);
                device.end_size.write_into(writer);
                (device.delta_format as u16).write_into(writer);
                device.delta_value.write_into(writer);
            }
            DeviceOrVariationIndex::VariationIndex(index) => {
                index.delta_set_outer_index.write_into(writer);
                index.delta_set_inner_index.write_into(writer);
                VARIATION_INDEX_FORMAT.write_into(writer);
            }
        }
    }
}

impl Validate for DeviceOrVariationIndex {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        if let DeviceOrVariationIndex::Device(device) = self {
            ctx.in_field("delta_value", |ctx| {
                if device.start_size > device.end_size {
                    ctx.report("start_size larger than end_size");
                } else if device.delta_value.len() != device.expected_words() {
                    ctx.report(format!(
                        "expected {} packed words, found {}",
                        device.expected_words(),
                        device.delta_value.len()
                    ));
                }
            })
        }
    }
}
