//! the [GDEF] table
//!
//! [GDEF]: https://docs.microsoft.com/en-us/typography/opentype/spec/gdef

use std::collections::BTreeMap;

use font_types::{GlyphId16, Tag};

use super::layout::{ClassDef, CoverageTable, CoverageTableBuilder, DeviceOrVariationIndex};
use crate::{
    font_data::FontData,
    read::{FontRead, ReadError},
    tables::TopLevelTable,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, RawBytes, TableWriter},
};

/// The glyph class values used in [`Gdef::glyph_class_def`].
pub mod glyph_class {
    pub const BASE: u16 = 1;
    pub const LIGATURE: u16 = 2;
    pub const MARK: u16 = 3;
    pub const COMPONENT: u16 = 4;
}

/// The [GDEF] table.
///
/// The version is not stored; it is the lowest version able to hold the
/// subtables that are present.
///
/// [GDEF]: https://docs.microsoft.com/en-us/typography/opentype/spec/gdef
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gdef {
    pub glyph_class_def: Option<ClassDef>,
    pub attach_list: Option<AttachList>,
    pub lig_caret_list: Option<LigCaretList>,
    pub mark_attach_class_def: Option<ClassDef>,
    pub mark_glyph_sets_def: Option<MarkGlyphSets>,
    pub item_var_store: Option<ItemVariationStore>,
}

/// Contour point indices used for attachment, per glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttachList {
    pub coverage: CoverageTable,
    pub attach_points: Vec<AttachPoint>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttachPoint {
    pub point_indices: Vec<u16>,
}

/// Caret positions for ligature glyphs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LigCaretList {
    pub coverage: CoverageTable,
    pub lig_glyphs: Vec<LigGlyph>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LigGlyph {
    pub caret_values: Vec<CaretValue>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaretValue {
    /// A design-unit x or y value.
    Format1 { coordinate: i16 },
    /// A contour point on the ligature glyph.
    Format2 { caret_value_point_index: u16 },
    /// A design-unit value adjusted by a device table.
    Format3 {
        coordinate: i16,
        device: DeviceOrVariationIndex,
    },
}

/// Sets of mark glyphs, referenced by lookup flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkGlyphSets {
    pub coverages: Vec<CoverageTable>,
}

/// An item variation store, kept as the bytes it occupies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemVariationStore {
    pub data: Vec<u8>,
}

impl TopLevelTable for Gdef {
    const TAG: Tag = Tag::new(b"GDEF");
}

impl Gdef {
    fn compute_version(&self) -> (u16, u16) {
        if self.item_var_store.is_some() {
            (1, 3)
        } else if self.mark_glyph_sets_def.is_some() {
            (1, 2)
        } else {
            (1, 0)
        }
    }

    /// The class of `glyph`, or 0 if it has none.
    pub fn glyph_class(&self, glyph: GlyphId16) -> u16 {
        self.glyph_class_def
            .as_ref()
            .map(|classes| classes.get(glyph))
            .unwrap_or_default()
    }
}

impl AttachList {
    pub fn new(points: BTreeMap<GlyphId16, Vec<u16>>) -> Self {
        let coverage = CoverageTableBuilder::from_glyphs(points.keys().copied().collect()).build();
        let attach_points = points
            .into_values()
            .map(|point_indices| AttachPoint { point_indices })
            .collect();
        AttachList {
            coverage,
            attach_points,
        }
    }

    pub fn get(&self, glyph: GlyphId16) -> Option<&[u16]> {
        let idx = self.coverage.get(glyph)?;
        self.attach_points
            .get(idx as usize)
            .map(|point| point.point_indices.as_slice())
    }
}

impl LigCaretList {
    pub fn new(carets: BTreeMap<GlyphId16, Vec<CaretValue>>) -> Self {
        let coverage = CoverageTableBuilder::from_glyphs(carets.keys().copied().collect()).build();
        let lig_glyphs = carets
            .into_values()
            .map(|caret_values| LigGlyph { caret_values })
            .collect();
        LigCaretList {
            coverage,
            lig_glyphs,
        }
    }

    pub fn get(&self, glyph: GlyphId16) -> Option<&[CaretValue]> {
        let idx = self.coverage.get(glyph)?;
        self.lig_glyphs
            .get(idx as usize)
            .map(|lig| lig.caret_values.as_slice())
    }
}

impl MarkGlyphSets {
    /// `true` if `glyph` belongs to the set at `set_index`.
    pub fn contains(&self, set_index: u16, glyph: GlyphId16) -> bool {
        self.coverages
            .get(set_index as usize)
            .is_some_and(|coverage| coverage.get(glyph).is_some())
    }
}

impl ItemVariationStore {
    /// Find the extent of the store at the start of `data`, so that only its
    /// own bytes are kept.
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        const LONG_WORDS: u16 = 0x8000;
        let mut cursor = data.cursor();
        let _format: u16 = cursor.read()?;
        let region_list_offset = cursor.read::<u32>()? as usize;
        let data_count: u16 = cursor.read()?;
        let data_offsets: Vec<u32> = cursor.read_array(data_count as usize)?;
        let mut end = cursor.position();

        if region_list_offset != 0 {
            let axis_count = data.read_at::<u16>(region_list_offset)? as usize;
            let region_count = data.read_at::<u16>(region_list_offset + 2)? as usize;
            end = end.max(region_list_offset + 4 + axis_count * region_count * 6);
        }
        for offset in data_offsets.into_iter().filter(|off| *off != 0) {
            let offset = offset as usize;
            let item_count = data.read_at::<u16>(offset)? as usize;
            let word_delta_count = data.read_at::<u16>(offset + 2)?;
            let region_index_count = data.read_at::<u16>(offset + 4)? as usize;
            let word_count = (word_delta_count & !LONG_WORDS) as usize;
            let (word_size, short_size) = if word_delta_count & LONG_WORDS != 0 {
                (4, 2)
            } else {
                (2, 1)
            };
            let row_size = word_count * word_size
                + region_index_count.saturating_sub(word_count) * short_size;
            end = end.max(offset + 6 + region_index_count * 2 + item_count * row_size);
        }
        let bytes = data.slice(..end).ok_or(ReadError::OutOfBounds)?;
        Ok(ItemVariationStore {
            data: bytes.as_bytes().to_vec(),
        })
    }
}

fn read_nullable<T: FontRead>(data: FontData<'_>, offset: u16) -> Result<Option<T>, ReadError> {
    match offset {
        0 => Ok(None),
        offset => T::read(data.offset_data(offset as usize)?).map(Some),
    }
}

impl FontRead for Gdef {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let major: u16 = cursor.read()?;
        let minor: u16 = cursor.read()?;
        if major != 1 {
            return Err(ReadError::InvalidFormat(major.into()));
        }
        let glyph_class_def = read_nullable(data, cursor.read()?)?;
        let attach_list = read_nullable(data, cursor.read()?)?;
        let lig_caret_list = read_nullable(data, cursor.read()?)?;
        let mark_attach_class_def = read_nullable(data, cursor.read()?)?;
        let mark_glyph_sets_def = match minor {
            2.. => read_nullable(data, cursor.read()?)?,
            _ => None,
        };
        let item_var_store = match minor {
            3.. => match cursor.read::<u32>()? {
                0 => None,
                offset => Some(ItemVariationStore::read(
                    data.offset_data(offset as usize)?,
                )?),
            },
            _ => None,
        };
        Ok(Gdef {
            glyph_class_def,
            attach_list,
            lig_caret_list,
            mark_attach_class_def,
            mark_glyph_sets_def,
            item_var_store,
        })
    }
}

impl FontRead for AttachList {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let coverage_offset: u16 = cursor.read()?;
        let glyph_count: u16 = cursor.read()?;
        let offsets: Vec<u16> = cursor.read_array(glyph_count as usize)?;
        let coverage = CoverageTable::read(data.offset_data(coverage_offset as usize)?)?;
        let attach_points = offsets
            .into_iter()
            .map(|offset| {
                let mut cursor = data.offset_data(offset as usize)?.cursor();
                let point_count: u16 = cursor.read()?;
                Ok(AttachPoint {
                    point_indices: cursor.read_array(point_count as usize)?,
                })
            })
            .collect::<Result<_, ReadError>>()?;
        Ok(AttachList {
            coverage,
            attach_points,
        })
    }
}

impl FontRead for LigCaretList {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let coverage_offset: u16 = cursor.read()?;
        let lig_glyph_count: u16 = cursor.read()?;
        let offsets: Vec<u16> = cursor.read_array(lig_glyph_count as usize)?;
        let coverage = CoverageTable::read(data.offset_data(coverage_offset as usize)?)?;
        let lig_glyphs = offsets
            .into_iter()
            .map(|offset| LigGlyph::read(data.offset_data(offset as usize)?))
            .collect::<Result<_, _>>()?;
        Ok(LigCaretList {
            coverage,
            lig_glyphs,
        })
    }
}

impl FontRead for LigGlyph {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let caret_count: u16 = cursor.read()?;
        let offsets: Vec<u16> = cursor.read_array(caret_count as usize)?;
        let caret_values = offsets
            .into_iter()
            .map(|offset| CaretValue::read(data.offset_data(offset as usize)?))
            .collect::<Result<_, _>>()?;
        Ok(LigGlyph { caret_values })
    }
}

impl FontRead for CaretValue {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        match cursor.read::<u16>()? {
            1 => Ok(CaretValue::Format1 {
                coordinate: cursor.read()?,
            }),
            2 => Ok(CaretValue::Format2 {
                caret_value_point_index: cursor.read()?,
            }),
            3 => {
                let coordinate = cursor.read()?;
                let device_offset: u16 = cursor.read()?;
                let device = DeviceOrVariationIndex::read(data.offset_data(device_offset as usize)?)?;
                Ok(CaretValue::Format3 { coordinate, device })
            }
            other => Err(ReadError::InvalidFormat(other.into())),
        }
    }
}

impl FontRead for MarkGlyphSets {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format.into()));
        }
        let count: u16 = cursor.read()?;
        let offsets: Vec<u32> = cursor.read_array(count as usize)?;
        let coverages = offsets
            .into_iter()
            .map(|offset| CoverageTable::read(data.offset_data(offset as usize)?))
            .collect::<Result<_, _>>()?;
        Ok(MarkGlyphSets { coverages })
    }
}

fn nullable<T: FontWrite>(table: &Option<T>) -> Option<&dyn FontWrite> {
    table.as_ref().map(|t| t as &dyn FontWrite)
}

impl FontWrite for Gdef {
    fn write_into(&self, writer: &mut TableWriter) {
        let (major, minor) = self.compute_version();
        major.write_into(writer);
        minor.write_into(writer);
        writer.write_nullable_offset(nullable(&self.glyph_class_def), 2);
        writer.write_nullable_offset(nullable(&self.attach_list), 2);
        writer.write_nullable_offset(nullable(&self.lig_caret_list), 2);
        writer.write_nullable_offset(nullable(&self.mark_attach_class_def), 2);
        if minor >= 2 {
            writer.write_nullable_offset(nullable(&self.mark_glyph_sets_def), 2);
        }
        if minor >= 3 {
            writer.write_nullable_offset(nullable(&self.item_var_store), 4);
        }
    }
}

impl FontWrite for AttachList {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write_offset(&self.coverage, 2);
        (self.attach_points.len() as u16).write_into(writer);
        for point in &self.attach_points {
            writer.write_offset(point, 2);
        }
    }
}

impl FontWrite for AttachPoint {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.point_indices.len() as u16).write_into(writer);
        self.point_indices.write_into(writer);
    }
}

impl FontWrite for LigCaretList {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write_offset(&self.coverage, 2);
        (self.lig_glyphs.len() as u16).write_into(writer);
        for lig in &self.lig_glyphs {
            writer.write_offset(lig, 2);
        }
    }
}

impl FontWrite for LigGlyph {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.caret_values.len() as u16).write_into(writer);
        for caret in &self.caret_values {
            writer.write_offset(caret, 2);
        }
    }
}

impl FontWrite for CaretValue {
    fn write_into(&self, writer: &mut TableWriter) {
        match self {
            CaretValue::Format1 { coordinate } => {
                1u16.write_into(writer);
                coordinate.write_into(writer);
            }
            CaretValue::Format2 {
                caret_value_point_index,
            } => {
                2u16.write_into(writer);
                caret_value_point_index.write_into(writer);
            }
            CaretValue::Format3 { coordinate, device } => {
                3u16.write_into(writer);
                coordinate.write_into(writer);
                writer.write_offset(device, 2);
            }
        }
    }
}

impl FontWrite for MarkGlyphSets {
    fn write_into(&self, writer: &mut TableWriter) {
        1u16.write_into(writer);
        (self.coverages.len() as u16).write_into(writer);
        for coverage in &self.coverages {
            writer.write_offset(coverage, 4);
        }
    }
}

impl FontWrite for ItemVariationStore {
    fn write_into(&self, writer: &mut TableWriter) {
        RawBytes(&self.data).write_into(writer)
    }
}

impl Validate for Gdef {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("GDEF", |ctx| {
            if let Some(classes) = &self.glyph_class_def {
                ctx.in_field("glyph_class_def", |ctx| {
                    classes.validate_impl(ctx);
                    if classes.iter().any(|(_, cls)| cls > glyph_class::COMPONENT) {
                        ctx.report("glyph classes must be between 1 and 4");
                    }
                });
            }
            if let Some(list) = &self.attach_list {
                ctx.in_field("attach_list", |ctx| {
                    list.coverage.validate_impl(ctx);
                    if list.coverage.len() != list.attach_points.len() {
                        ctx.report("coverage and attach points differ in length");
                    }
                });
            }
            if let Some(list) = &self.lig_caret_list {
                ctx.in_field("lig_caret_list", |ctx| {
                    list.coverage.validate_impl(ctx);
                    if list.coverage.len() != list.lig_glyphs.len() {
                        ctx.report("coverage and ligature glyphs differ in length");
                    }
                    ctx.in_array(&list.lig_glyphs, |ctx, lig| {
                        ctx.in_array(&lig.caret_values, |ctx, caret| {
                            if let CaretValue::Format3 { device, .. } = caret {
                                device.validate_impl(ctx);
                            }
                        })
                    });
                });
            }
            if let Some(classes) = &self.mark_attach_class_def {
                ctx.in_field("mark_attach_class_def", |ctx| classes.validate_impl(ctx));
            }
            if let Some(sets) = &self.mark_glyph_sets_def {
                ctx.in_field("mark_glyph_sets_def", |ctx| {
                    if sets.coverages.len() > u16::MAX as usize {
                        ctx.report("array exceeds max length");
                    }
                    ctx.in_array(&sets.coverages, |ctx, coverage| coverage.validate_impl(ctx));
                });
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tables::layout::Device, write::dump_table};
    use pretty_assertions::assert_eq;

    fn gid(raw: u16) -> GlyphId16 {
        GlyphId16::new(raw)
    }

    fn class_def(pairs: &[(u16, u16)]) -> ClassDef {
        pairs
            .iter()
            .map(|(g, cls)| (gid(*g), *cls))
            .collect::<crate::tables::layout::ClassDefBuilder>()
            .build()
    }

    // a store with one region on one axis, and one data subtable of two
    // byte-sized deltas
    #[rustfmt::skip]
    const VAR_STORE: &[u8] = &[
        0x00, 0x01, 0x00, 0x00, 0x00, 0x0C, 0x00, 0x01, 0x00, 0x00, 0x00, 0x16,
        0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x40, 0x00, 0x40, 0x00,
        0x00, 0x02, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x05, 0xFB,
    ];

    #[test]
    fn glyph_classes_only() {
        let gdef = Gdef {
            glyph_class_def: Some(class_def(&[(1, 1), (2, 1), (3, 3)])),
            ..Default::default()
        };
        let bytes = dump_table(&gdef).unwrap();
        #[rustfmt::skip]
        let expected = [
            0x00, 0x01, 0x00, 0x00, 0x00, 0x0C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x01, 0x00, 0x01, 0x00, 0x03, 0x00, 0x01, 0x00, 0x01, 0x00, 0x03,
        ];
        assert_eq!(bytes, expected);
        let loaded = Gdef::read(FontData::new(&bytes)).unwrap();
        assert_eq!(loaded, gdef);
        assert_eq!(loaded.glyph_class(gid(3)), glyph_class::MARK);
        assert_eq!(loaded.glyph_class(gid(9)), 0);
    }

    #[test]
    fn everything_roundtrips() {
        let carets = BTreeMap::from([
            (gid(20), vec![CaretValue::Format1 { coordinate: 300 }]),
            (
                gid(21),
                vec![
                    CaretValue::Format2 {
                        caret_value_point_index: 7,
                    },
                    CaretValue::Format3 {
                        coordinate: 620,
                        device: Device::new(12, 14, &[1, 0, -1]).into(),
                    },
                ],
            ),
        ]);
        let gdef = Gdef {
            glyph_class_def: Some(class_def(&[(20, 2), (21, 2), (30, 3)])),
            attach_list: Some(AttachList::new(BTreeMap::from([
                (gid(5), vec![0, 4]),
                (gid(6), vec![2]),
            ]))),
            lig_caret_list: Some(LigCaretList::new(carets)),
            mark_attach_class_def: Some(class_def(&[(30, 1)])),
            mark_glyph_sets_def: Some(MarkGlyphSets {
                coverages: vec![[gid(30)].into_iter().collect()],
            }),
            item_var_store: Some(ItemVariationStore {
                data: VAR_STORE.to_vec(),
            }),
        };
        let bytes = dump_table(&gdef).unwrap();
        assert_eq!(&bytes[..4], &[0, 1, 0, 3]);
        let loaded = Gdef::read(FontData::new(&bytes)).unwrap();
        assert_eq!(loaded, gdef);

        assert_eq!(loaded.attach_list.as_ref().unwrap().get(gid(5)), Some(&[0, 4][..]));
        let lig_carets = loaded.lig_caret_list.as_ref().unwrap();
        assert_eq!(lig_carets.get(gid(21)).map(|c| c.len()), Some(2));
        assert!(lig_carets.get(gid(22)).is_none());
        assert!(loaded.mark_glyph_sets_def.as_ref().unwrap().contains(0, gid(30)));
    }

    #[test]
    fn version_follows_contents() {
        let mut gdef = Gdef::default();
        assert_eq!(gdef.compute_version(), (1, 0));
        assert_eq!(dump_table(&gdef).unwrap().len(), 12);

        gdef.mark_glyph_sets_def = Some(MarkGlyphSets::default());
        assert_eq!(gdef.compute_version(), (1, 2));

        // a var store without glyph sets still needs 1.3
        gdef.mark_glyph_sets_def = None;
        gdef.item_var_store = Some(ItemVariationStore {
            data: VAR_STORE.to_vec(),
        });
        assert_eq!(gdef.compute_version(), (1, 3));
        let bytes = dump_table(&gdef).unwrap();
        assert_eq!(&bytes[12..18], &[0, 0, 0, 0, 0, 18]);
        let loaded = Gdef::read(FontData::new(&bytes)).unwrap();
        assert!(loaded.mark_glyph_sets_def.is_none());
        assert_eq!(loaded.item_var_store, gdef.item_var_store);
    }

    #[test]
    fn var_store_extent() {
        let mut data = VAR_STORE.to_vec();
        data.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let store = ItemVariationStore::read(FontData::new(&data)).unwrap();
        assert_eq!(store.data, VAR_STORE);
    }

    #[test]
    fn mismatched_attach_list() {
        let mut list = AttachList::new(BTreeMap::from([(gid(5), vec![0])]));
        list.attach_points.push(AttachPoint::default());
        let gdef = Gdef {
            attach_list: Some(list),
            ..Default::default()
        };
        assert!(dump_table(&gdef).is_err());
    }

    #[test]
    fn bad_glyph_class() {
        let gdef = Gdef {
            glyph_class_def: Some(class_def(&[(1, 7)])),
            ..Default::default()
        };
        assert!(dump_table(&gdef).is_err());
    }
}
