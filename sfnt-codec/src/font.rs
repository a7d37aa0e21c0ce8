//! Decoding and encoding whole fonts.
//!
//! A [`Font`] owns a map of decoded tables. Decoding resolves tables on
//! demand, so that tables which need values from other tables (such as `glyf`
//! needing `loca` and `maxp`) can have them decoded first. Encoding pushes
//! the values derived from `glyf` into `loca`, `maxp` and `head` before the
//! tables are assembled.

use std::collections::BTreeMap;
use std::fmt::Display;

use font_types::{Tag, TT_SFNT_VERSION};

use crate::{
    error::Error,
    font_builder::{BuilderError, FontBuilder, TableDirectory},
    font_data::FontData,
    read::{FontRead, FontReadWithArgs, ReadError},
    tables::{
        cff::{Cff, Cff2},
        cmap::Cmap,
        cvt::Cvt,
        dsig::Dsig,
        fpgm::Fpgm,
        gdef::Gdef,
        glyf::Glyf,
        hdmx::Hdmx,
        head::{self, Head},
        hhea::Hhea,
        hmtx::Hmtx,
        kern::Kern,
        loca::{Loca, LocaFormat},
        maxp::Maxp,
        name::Name,
        os2::Os2,
        post::Post,
        prep::Prep,
        FromTable, Table, TopLevelTable,
    },
    util::checksum,
    validate::{Validate, ValidationCtx},
};

/// A decoded font: a set of tables, keyed by tag.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Font {
    /// `0x00010000` for TrueType outlines, `'OTTO'` for CFF.
    pub sfnt_version: u32,
    tables: BTreeMap<Tag, Table>,
    /// Problems noticed while decoding that did not prevent it.
    pub warnings: Vec<String>,
}

/// An error that stopped a font from being decoded.
///
/// The warnings collected before the error are included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeError {
    pub inner: ReadError,
    pub warnings: Vec<String>,
}

impl Default for Font {
    fn default() -> Self {
        Font::new(TT_SFNT_VERSION)
    }
}

impl Font {
    pub fn new(sfnt_version: u32) -> Self {
        Font {
            sfnt_version,
            tables: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Add a table, replacing any existing table with the same tag.
    pub fn insert<T: TopLevelTable + Into<Table>>(&mut self, table: T) -> Option<Table> {
        self.tables.insert(T::TAG, table.into())
    }

    /// Add a table that is not interpreted, replacing any existing table.
    pub fn insert_raw(&mut self, tag: Tag, data: Vec<u8>) -> Option<Table> {
        self.tables.insert(tag, Table::Unknown(data))
    }

    pub fn get<T: FromTable>(&self) -> Option<&T> {
        self.tables.get(&T::TAG).and_then(T::from_table)
    }

    pub fn get_mut<T: FromTable>(&mut self) -> Option<&mut T> {
        self.tables.get_mut(&T::TAG).and_then(T::from_table_mut)
    }

    /// The table with this tag, decoded or not.
    pub fn table(&self, tag: Tag) -> Option<&Table> {
        self.tables.get(&tag)
    }

    pub fn remove(&mut self, tag: Tag) -> Option<Table> {
        self.tables.remove(&tag)
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.tables.contains_key(&tag)
    }

    /// Iterate over the tables, in tag order.
    pub fn tables(&self) -> impl Iterator<Item = (Tag, &Table)> + '_ {
        self.tables.iter().map(|(tag, table)| (*tag, table))
    }

    /// The glyph count from `maxp`.
    pub fn num_glyphs(&self) -> Result<u16, ReadError> {
        self.get::<Maxp>()
            .map(|maxp| maxp.num_glyphs)
            .ok_or(ReadError::TableIsMissing(Maxp::TAG))
    }

    /// Decode a font from its binary representation.
    ///
    /// Checksum mismatches and table formats that are kept undecoded are
    /// reported in [`Font::warnings`]; anything else that cannot be read is
    /// an error.
    pub fn decode(data: &[u8]) -> Result<Font, DecodeError> {
        let mut warnings = Vec::new();
        match decode_impl(FontData::new(data), &mut warnings) {
            Ok((sfnt_version, tables)) => Ok(Font {
                sfnt_version,
                tables,
                warnings,
            }),
            Err(inner) => Err(DecodeError { inner, warnings }),
        }
    }

    /// Encode this font.
    ///
    /// Before the tables are compiled the derived values are brought up to
    /// date: `loca` is rebuilt from `glyf` (keeping its format if it can still
    /// hold the offsets), `maxp.num_glyphs` and `head.index_to_loc_format`
    /// follow it, and `hhea.number_of_h_metrics` follows `hmtx`. Afterwards
    /// `head.checksum_adjustment` holds the value written to the font.
    ///
    /// A `head` table is required.
    pub fn encode(&mut self) -> Result<Vec<u8>, BuilderError> {
        if !self.contains(Head::TAG) {
            return Err(BuilderError {
                tag: Head::TAG,
                inner: Error::TableIsMissing(Head::TAG),
            });
        }
        let glyf_data = self.sync_glyf()?;
        self.check_hmtx()?;
        self.sync_hhea();
        if let Some(head) = self.get_mut::<Head>() {
            head.checksum_adjustment = 0;
        }

        let mut builder = FontBuilder::new(self.sfnt_version);
        for (tag, table) in &self.tables {
            match (table, &glyf_data) {
                (Table::Glyf(_), Some(data)) => builder.add_raw(*tag, data.as_slice()),
                _ => {
                    let bytes = table
                        .compile()
                        .map_err(|inner| BuilderError { tag: *tag, inner })?;
                    log::debug!("compiled '{tag}', {} bytes", bytes.len());
                    builder.add_raw(*tag, bytes)
                }
            };
        }
        let bytes = builder.build();

        let adjustment = TableDirectory::read(FontData::new(&bytes))
            .ok()
            .and_then(|directory| directory.find(Head::TAG).copied())
            .and_then(|record| {
                FontData::new(&bytes)
                    .read_at::<u32>(record.offset as usize + head::CHECKSUM_ADJUSTMENT_OFFSET)
                    .ok()
            });
        if let (Some(head), Some(adjustment)) = (self.get_mut::<Head>(), adjustment) {
            head.checksum_adjustment = adjustment;
        }
        Ok(bytes)
    }

    /// Compile `glyf` and push the results into `loca`, `maxp` and `head`.
    fn sync_glyf(&mut self) -> Result<Option<Vec<u8>>, BuilderError> {
        let Some(glyf) = self.get::<Glyf>() else {
            return Ok(None);
        };
        let (data, offsets) = glyf
            .compile()
            .map_err(|inner| BuilderError { tag: Glyf::TAG, inner })?;
        // compile has checked that the count fits
        let num_glyphs = glyf.glyphs.len() as u16;

        let format = self
            .get::<Loca>()
            .map(|loca| loca.format)
            .filter(|format| format.can_represent(&offsets))
            .unwrap_or_else(|| LocaFormat::for_offsets(&offsets));
        self.insert(Loca { offsets, format });

        match self.get_mut::<Maxp>() {
            Some(maxp) => maxp.num_glyphs = num_glyphs,
            None => {
                self.insert(Maxp::new(num_glyphs));
            }
        }
        if let Some(head) = self.get_mut::<Head>() {
            head.index_to_loc_format = format.to_index_to_loc_format();
        }
        Ok(Some(data))
    }

    /// `hmtx` must describe exactly `maxp.num_glyphs` glyphs, or it will not
    /// decode to the same value.
    fn check_hmtx(&self) -> Result<(), BuilderError> {
        let (Some(hmtx), Some(maxp)) = (self.get::<Hmtx>(), self.get::<Maxp>()) else {
            return Ok(());
        };
        HmtxGlyphCount {
            hmtx,
            num_glyphs: maxp.num_glyphs,
        }
        .validate()
        .map_err(|report| BuilderError {
            tag: Hmtx::TAG,
            inner: report.into(),
        })
    }

    fn sync_hhea(&mut self) {
        let Some(n_metrics) = self.get::<Hmtx>().map(|hmtx| hmtx.h_metrics.len()) else {
            return;
        };
        if let Some(hhea) = self.get_mut::<Hhea>() {
            hhea.number_of_h_metrics = n_metrics as u16;
        }
    }
}

struct HmtxGlyphCount<'a> {
    hmtx: &'a Hmtx,
    num_glyphs: u16,
}

impl Validate for HmtxGlyphCount<'_> {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("hmtx", |ctx| {
            ctx.in_field("left_side_bearings", |ctx| {
                let found = self.hmtx.num_glyphs();
                if found != self.num_glyphs as usize {
                    ctx.report(format!(
                        "{found} glyphs have metrics, but maxp.num_glyphs is {}",
                        self.num_glyphs
                    ));
                }
            })
        })
    }
}

fn decode_impl(
    font: FontData<'_>,
    warnings: &mut Vec<String>,
) -> Result<(u32, BTreeMap<Tag, Table>), ReadError> {
    let directory = TableDirectory::read(font)?;
    let mut resolver = TableResolver::default();
    for record in &directory.table_records {
        let data = record.data(font)?;
        let computed = match record.tag == Head::TAG {
            true => head_checksum(data.as_bytes()),
            false => checksum(data.as_bytes()),
        };
        if computed != record.checksum {
            warn(
                warnings,
                format!(
                    "checksum mismatch for '{}': directory has 0x{:08X}, data sums to 0x{computed:08X}",
                    record.tag, record.checksum
                ),
            );
        }
        if resolver.raw.insert(record.tag, data).is_some() {
            warn(warnings, format!("duplicate '{}' table, keeping the last", record.tag));
        }
    }

    let tags = resolver.raw.keys().copied().collect::<Vec<_>>();
    for tag in tags {
        resolver.resolve(tag)?;
    }
    for (tag, table) in &resolver.decoded {
        for warning in table.decode_warnings() {
            warn(warnings, format!("'{tag}': {warning}"));
        }
    }
    Ok((directory.sfnt_version, resolver.decoded))
}

fn warn(warnings: &mut Vec<String>, message: String) {
    log::warn!("{message}");
    warnings.push(message);
}

/// The checksum of `head`, computed as if `checksumAdjustment` were zero.
fn head_checksum(data: &[u8]) -> u32 {
    let mut scratch = data.to_vec();
    let range = head::CHECKSUM_ADJUSTMENT_OFFSET..head::CHECKSUM_ADJUSTMENT_OFFSET + 4;
    if let Some(field) = scratch.get_mut(range) {
        field.fill(0);
    }
    checksum(&scratch)
}

/// Decodes each table at most once, decoding the tables it depends on first.
#[derive(Default)]
struct TableResolver<'a> {
    raw: BTreeMap<Tag, FontData<'a>>,
    decoded: BTreeMap<Tag, Table>,
}

impl TableResolver<'_> {
    /// Ensure the table for `tag` is decoded, if the font has one.
    fn resolve(&mut self, tag: Tag) -> Result<(), ReadError> {
        if self.decoded.contains_key(&tag) {
            return Ok(());
        }
        let Some(data) = self.raw.get(&tag).copied() else {
            return Ok(());
        };
        let table = self.decode(tag, data)?;
        log::trace!("decoded '{tag}'");
        self.decoded.insert(tag, table);
        Ok(())
    }

    /// Resolve a dependency that must be present.
    fn require<T: FromTable>(&mut self) -> Result<&T, ReadError> {
        self.resolve(T::TAG)?;
        self.decoded
            .get(&T::TAG)
            .and_then(T::from_table)
            .ok_or(ReadError::TableIsMissing(T::TAG))
    }

    fn decode(&mut self, tag: Tag, data: FontData<'_>) -> Result<Table, ReadError> {
        Ok(match &tag.to_be_bytes() {
            b"head" => Head::read(data)?.into(),
            b"hhea" => Hhea::read(data)?.into(),
            b"maxp" => Maxp::read(data)?.into(),
            b"hmtx" => {
                let num_glyphs = self.require::<Maxp>()?.num_glyphs;
                let n_metrics = self.require::<Hhea>()?.number_of_h_metrics;
                Hmtx::read_with_args(data, &(n_metrics, num_glyphs))?.into()
            }
            b"loca" => {
                let raw_format = self.require::<Head>()?.index_to_loc_format;
                let format = LocaFormat::from_index_to_loc_format(raw_format);
                Loca::read_with_args(data, &format)?.into()
            }
            b"glyf" => {
                let num_glyphs = self.require::<Maxp>()?.num_glyphs;
                let loca = self.require::<Loca>()?;
                Glyf::read_with_loca(data, loca, num_glyphs)?.into()
            }
            b"hdmx" => {
                let num_glyphs = self.require::<Maxp>()?.num_glyphs;
                Hdmx::read_with_args(data, &num_glyphs)?.into()
            }
            b"cmap" => Cmap::read(data)?.into(),
            b"name" => Name::read(data)?.into(),
            b"OS/2" => Os2::read(data)?.into(),
            b"post" => Post::read(data)?.into(),
            b"cvt " => Cvt::read(data)?.into(),
            b"fpgm" => Fpgm::read(data)?.into(),
            b"prep" => Prep::read(data)?.into(),
            b"kern" => Kern::read(data)?.into(),
            b"GDEF" => Gdef::read(data)?.into(),
            b"CFF " => Cff::read(data)?.into(),
            b"CFF2" => Cff2::read(data)?.into(),
            b"DSIG" => Dsig::read(data)?.into(),
            _ => Table::Unknown(data.as_bytes().to_vec()),
        })
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to decode font: {}", self.inner)?;
        if !self.warnings.is_empty() {
            write!(f, " ({} warnings)", self.warnings.len())?;
        }
        Ok(())
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{
        glyf::{Bbox, Glyph, SimpleGlyph},
        hmtx::LongMetric,
    };
    use pretty_assertions::assert_eq;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn square() -> Glyph {
        let glyph = SimpleGlyph::read(FontData::new(font_test_data::glyf::SIMPLE_GLYPH)).unwrap();
        Glyph::Simple(glyph)
    }

    fn minimal_font() -> Font {
        let mut font = Font::default();
        font.insert(Head::default());
        font.insert(Hhea::default());
        font.insert(Glyf::new(vec![Glyph::Empty(Default::default()), square()]));
        font.insert(Hmtx::new(
            vec![
                LongMetric {
                    advance: 500,
                    side_bearing: 0,
                },
                LongMetric {
                    advance: 600,
                    side_bearing: 100,
                },
            ],
            vec![],
        ));
        font
    }

    #[test]
    fn encode_synthesizes_dependents() {
        init_logging();
        let mut font = minimal_font();
        let bytes = font.encode().unwrap();

        assert_eq!(font.num_glyphs(), Ok(2));
        let loca = font.get::<Loca>().unwrap();
        let glyph_len = font_test_data::glyf::SIMPLE_GLYPH.len() as u32;
        assert_eq!(loca.offsets, [0, 0, glyph_len]);
        assert_eq!(loca.format, LocaFormat::Short);
        assert_eq!(font.get::<Hhea>().unwrap().number_of_h_metrics, 2);
        assert_eq!(checksum(&bytes), crate::font_builder::CHECKSUM_MAGIC);

        let decoded = Font::decode(&bytes).unwrap();
        assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
        assert_eq!(decoded.tables, font.tables);
    }

    #[test]
    fn existing_long_loca_is_kept() {
        let mut font = minimal_font();
        font.insert(Loca {
            offsets: vec![],
            format: LocaFormat::Long,
        });
        font.encode().unwrap();
        assert_eq!(font.get::<Loca>().unwrap().format, LocaFormat::Long);
        assert_eq!(font.get::<Head>().unwrap().index_to_loc_format, 1);
    }

    #[test]
    fn head_is_required() {
        let mut font = minimal_font();
        font.remove(Head::TAG);
        let err = font.encode().unwrap_err();
        assert_eq!(err.tag, Head::TAG);
        assert_eq!(err.inner, Error::TableIsMissing(Head::TAG));
    }

    #[test]
    fn missing_maxp_is_descriptive() {
        let font = Font::default();
        assert_eq!(
            font.num_glyphs(),
            Err(ReadError::TableIsMissing(Maxp::TAG))
        );
    }

    #[test]
    fn encode_error_names_table() {
        use crate::tables::kern::{KernPair, KernSubtable};
        let mut font = minimal_font();
        font.insert(Kern::new(vec![KernSubtable::horizontal(vec![
            KernPair::new(5, 1, 10),
            KernPair::new(1, 5, 10),
        ])]));
        let err = font.encode().unwrap_err();
        assert_eq!(err.tag, Kern::TAG);
        assert!(matches!(err.inner, Error::ValidationFailed(_)));
    }

    #[test]
    fn hmtx_must_cover_every_glyph() {
        let mut font = minimal_font();
        font.get_mut::<Hmtx>().unwrap().left_side_bearings.push(-5);
        let err = font.encode().unwrap_err();
        assert_eq!(err.tag, Hmtx::TAG);
        let Error::ValidationFailed(report) = err.inner else {
            panic!("expected validation failure");
        };
        assert_eq!(
            report.messages().collect::<Vec<_>>(),
            ["3 glyphs have metrics, but maxp.num_glyphs is 2"]
        );

        font.get_mut::<Hmtx>().unwrap().left_side_bearings.clear();
        font.get_mut::<Hmtx>().unwrap().h_metrics.pop();
        assert!(font.encode().is_err());
    }

    #[test]
    fn unknown_tables_kept_verbatim() {
        let mut font = minimal_font();
        font.insert_raw(Tag::new(b"XYZW"), vec![1, 2, 3]);
        let bytes = font.encode().unwrap();
        let decoded = Font::decode(&bytes).unwrap();
        assert_eq!(
            decoded.table(Tag::new(b"XYZW")),
            Some(&Table::Unknown(vec![1, 2, 3]))
        );
    }

    #[test]
    fn head_checksum_ignores_adjustment() {
        let head = crate::write::dump_table(&Head::default()).unwrap();
        let mut adjusted = head.clone();
        adjusted[8..12].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(head_checksum(&adjusted), checksum(&head));
    }

    #[test]
    fn glyph_count_mismatch_is_fatal() {
        let mut font = minimal_font();
        let mut bytes = font.encode().unwrap();
        // patch maxp.numGlyphs after the fact
        let directory = TableDirectory::read(FontData::new(&bytes)).unwrap();
        let maxp = *directory.find(Maxp::TAG).unwrap();
        let pos = maxp.offset as usize + 4;
        bytes[pos..pos + 2].copy_from_slice(&5u16.to_be_bytes());

        let err = Font::decode(&bytes).unwrap_err();
        assert_eq!(
            err.inner,
            ReadError::GlyphCountMismatch {
                loca: 2,
                num_glyphs: 5
            }
        );
        // the patched table no longer matches its checksum
        assert_eq!(err.warnings.len(), 1);
    }

    #[test]
    fn bbox_of_decoded_glyph() {
        let mut font = minimal_font();
        let bytes = font.encode().unwrap();
        let decoded = Font::decode(&bytes).unwrap();
        let glyf = decoded.get::<Glyf>().unwrap();
        assert_eq!(glyf.glyphs[0].bbox(), None);
        assert!(matches!(glyf.glyphs[1].bbox(), Some(Bbox { .. })));
    }
}
