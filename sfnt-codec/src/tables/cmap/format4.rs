//! [Format 4]: segment mapping to delta values
//!
//! [Format 4]: https://learn.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values

use std::collections::BTreeMap;

use font_types::GlyphId16;

use crate::{
    font_data::FontData,
    read::{FontRead, ReadError},
    util::SearchRange,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

const HEADER_LEN: usize = 14;
const MISSING_GLYPH_CODE: u16 = 0xFFFF;

/// A format 4 subtable: a list of contiguous code ranges.
///
/// Each segment is written either as an arithmetic delta (when it maps
/// consecutive codes to consecutive glyphs) or as an explicit glyph array;
/// the choice is made when the table is written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cmap4 {
    pub language: u16,
    pub segments: Vec<Segment>,
}

/// A contiguous range of codes and the glyphs they map to.
///
/// Both directions of the mapping are stored so either lookup is a map
/// access. `id_delta` and `id_range_offset` hold the values found when the
/// segment was decoded; they are recomputed when writing.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    code_to_gid: BTreeMap<u16, GlyphId16>,
    gid_to_code: BTreeMap<GlyphId16, Vec<u16>>,
    pub id_delta: i16,
    pub id_range_offset: u16,
}

/// How a segment is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SegmentKind {
    Delta(i16),
    Explicit,
}

impl Segment {
    pub fn new(mappings: impl IntoIterator<Item = (u16, GlyphId16)>) -> Self {
        let mut segment = Segment::default();
        for (code, gid) in mappings {
            segment.insert(code, gid);
        }
        segment
    }

    fn insert(&mut self, code: u16, gid: GlyphId16) {
        if let Some(prev) = self.code_to_gid.insert(code, gid) {
            if let Some(codes) = self.gid_to_code.get_mut(&prev) {
                codes.retain(|c| *c != code);
                if codes.is_empty() {
                    self.gid_to_code.remove(&prev);
                }
            }
        }
        let codes = self.gid_to_code.entry(gid).or_default();
        if let Err(pos) = codes.binary_search(&code) {
            codes.insert(pos, code);
        }
    }

    /// The first code in the segment.
    pub fn start_code(&self) -> Option<u16> {
        self.code_to_gid.keys().next().copied()
    }

    /// The last code in the segment.
    pub fn end_code(&self) -> Option<u16> {
        self.code_to_gid.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.code_to_gid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code_to_gid.is_empty()
    }

    pub fn gid(&self, code: u16) -> Option<GlyphId16> {
        self.code_to_gid.get(&code).copied()
    }

    /// The codes mapped to `gid`, in increasing order.
    pub fn codes(&self, gid: GlyphId16) -> &[u16] {
        self.gid_to_code
            .get(&gid)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, GlyphId16)> + '_ {
        self.code_to_gid.iter().map(|(code, gid)| (*code, *gid))
    }

    /// `true` if the codes form a single range with no gaps.
    fn is_contiguous(&self) -> bool {
        match (self.start_code(), self.end_code()) {
            (Some(start), Some(end)) => (end - start) as usize + 1 == self.len(),
            _ => false,
        }
    }

    fn kind(&self) -> SegmentKind {
        let mut iter = self.iter();
        let Some((first_code, first_gid)) = iter.next() else {
            return SegmentKind::Delta(0);
        };
        let mut prev_gid = first_gid.to_u16();
        for (_, gid) in iter {
            if prev_gid.checked_add(1) != Some(gid.to_u16()) {
                return SegmentKind::Explicit;
            }
            prev_gid = gid.to_u16();
        }
        SegmentKind::Delta(first_gid.to_u16().wrapping_sub(first_code) as i16)
    }
}

// the stored delta and offset are an encoding detail
impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.code_to_gid == other.code_to_gid
    }
}

impl Eq for Segment {}

impl Cmap4 {
    pub fn new(segments: Vec<Segment>) -> Self {
        Cmap4 {
            language: 0,
            segments,
        }
    }

    /// Build a subtable from the code points assigned to each glyph.
    ///
    /// `glyphs[i]` holds the code points of glyph `i`. Glyphs 0 and 1 (the
    /// missing and null glyphs) are never mapped, and code points outside the
    /// BMP are ignored. If a code is assigned to more than one glyph, the
    /// lowest glyph id wins.
    ///
    /// A final segment mapping `0xFFFF` to glyph 0 is always present.
    pub fn from_glyphs<T: AsRef<[u32]>>(glyphs: &[T]) -> Self {
        let mut mappings: Vec<(u16, GlyphId16)> = glyphs
            .iter()
            .enumerate()
            .skip(2)
            .take(u16::MAX as usize - 1)
            .flat_map(|(gid, codes)| {
                let gid = GlyphId16::new(gid as u16);
                codes
                    .as_ref()
                    .iter()
                    .filter_map(move |code| u16::try_from(*code).ok().map(|code| (code, gid)))
            })
            .collect();
        mappings.sort();
        mappings.dedup_by_key(|(code, _)| *code);

        let mut segments: Vec<Segment> = Vec::new();
        let mut prev_code: Option<u16> = None;
        for (code, gid) in mappings {
            match (segments.last_mut(), prev_code) {
                (Some(current), Some(prev)) if prev.checked_add(1) == Some(code) => {
                    current.insert(code, gid)
                }
                _ => segments.push(Segment::new([(code, gid)])),
            }
            prev_code = Some(code);
        }
        if prev_code != Some(MISSING_GLYPH_CODE) {
            segments.push(Segment::new([(MISSING_GLYPH_CODE, GlyphId16::NOTDEF)]));
        }
        Cmap4 {
            language: 0,
            segments,
        }
    }

    /// The glyph for `code`, or [`GlyphId16::NOTDEF`] if it is not mapped.
    pub fn gid(&self, code: u16) -> GlyphId16 {
        let idx = self
            .segments
            .partition_point(|seg| seg.end_code().is_some_and(|end| end < code));
        self.segments
            .get(idx)
            .and_then(|seg| seg.gid(code))
            .unwrap_or(GlyphId16::NOTDEF)
    }

    /// Every code mapped to `gid`, in increasing order.
    pub fn codes(&self, gid: GlyphId16) -> Vec<u16> {
        self.segments
            .iter()
            .flat_map(|seg| seg.codes(gid).iter().copied())
            .collect()
    }

    /// Iterate over all `(code, gid)` pairs, in code order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, GlyphId16)> + '_ {
        self.segments.iter().flat_map(Segment::iter)
    }

    fn seg_count(&self) -> usize {
        self.segments.len()
    }

    fn compute_length(&self) -> usize {
        let n_explicit: usize = self
            .segments
            .iter()
            .filter(|seg| seg.kind() == SegmentKind::Explicit)
            .map(Segment::len)
            .sum();
        HEADER_LEN + 2 + 8 * self.seg_count() + 2 * n_explicit
    }

    /// The `(id_delta, id_range_offset)` pair for each segment, as written.
    fn compute_deltas_and_offsets(&self) -> Vec<(i16, u16)> {
        let n = self.seg_count();
        let mut glyph_array_len = 0;
        self.segments
            .iter()
            .enumerate()
            .map(|(i, seg)| match seg.kind() {
                SegmentKind::Delta(delta) => (delta, 0),
                SegmentKind::Explicit => {
                    // distance from this segment's slot in idRangeOffsets
                    // to its run in the glyph array
                    let offset = 2 * (n - i) + glyph_array_len;
                    glyph_array_len += 2 * seg.len();
                    (0, offset as u16)
                }
            })
            .collect()
    }
}

impl FontRead for Cmap4 {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 4 {
            return Err(ReadError::InvalidFormat(format as _));
        }
        let _length: u16 = cursor.read()?;
        let language = cursor.read()?;
        let seg_count = cursor.read::<u16>()? as usize / 2;
        // searchRange, entrySelector, rangeShift are derived
        cursor.advance_by(6)?;
        let end_codes: Vec<u16> = cursor.read_array(seg_count)?;
        let _reserved_pad: u16 = cursor.read()?;
        let start_codes: Vec<u16> = cursor.read_array(seg_count)?;
        let id_deltas: Vec<i16> = cursor.read_array(seg_count)?;
        let id_range_offsets: Vec<u16> = cursor.read_array(seg_count)?;

        let range_offsets_start = HEADER_LEN + 2 + 6 * seg_count;
        let mut segments = Vec::with_capacity(seg_count);
        for (i, (&start, &end)) in start_codes.iter().zip(&end_codes).enumerate() {
            if start > end {
                return Err(ReadError::MalformedData("cmap4 segment start > end"));
            }
            let delta = id_deltas[i];
            let range_offset = id_range_offsets[i];
            let mut segment = Segment {
                id_delta: delta,
                id_range_offset: range_offset,
                ..Default::default()
            };
            for code in start as u32..=end as u32 {
                let raw_gid = if range_offset == 0 {
                    code
                } else {
                    let addr = range_offsets_start
                        + 2 * i
                        + range_offset as usize
                        + 2 * (code - start as u32) as usize;
                    data.read_at::<u16>(addr)? as u32
                };
                let gid = (raw_gid as i32 + delta as i32) & 0xFFFF;
                segment.insert(code as u16, GlyphId16::new(gid as u16));
            }
            segments.push(segment);
        }
        Ok(Cmap4 { language, segments })
    }
}

impl FontWrite for Cmap4 {
    fn write_into(&self, writer: &mut TableWriter) {
        let seg_count = self.seg_count();
        let search = SearchRange::compute(seg_count, 2);
        4u16.write_into(writer);
        (self.compute_length() as u16).write_into(writer);
        self.language.write_into(writer);
        ((seg_count * 2) as u16).write_into(writer);
        search.search_range.write_into(writer);
        search.entry_selector.write_into(writer);
        search.range_shift.write_into(writer);

        let starts_and_ends = || {
            self.segments.iter().map(|seg| {
                (
                    seg.start_code().unwrap_or_default(),
                    seg.end_code().unwrap_or_default(),
                )
            })
        };
        starts_and_ends().for_each(|(_, end)| end.write_into(writer));
        0u16.write_into(writer);
        starts_and_ends().for_each(|(start, _)| start.write_into(writer));

        let deltas_and_offsets = self.compute_deltas_and_offsets();
        deltas_and_offsets
            .iter()
            .for_each(|(delta, _)| delta.write_into(writer));
        deltas_and_offsets
            .iter()
            .for_each(|(_, offset)| offset.write_into(writer));

        for (seg, (_, offset)) in self.segments.iter().zip(&deltas_and_offsets) {
            if *offset != 0 {
                seg.iter().for_each(|(_, gid)| gid.write_into(writer));
            }
        }
    }
}

impl Validate for Cmap4 {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("Cmap4", |ctx| {
            ctx.in_field("segments", |ctx| {
                ctx.in_array(&self.segments, |ctx, seg| {
                    if seg.is_empty() {
                        ctx.report("cmap segment is empty");
                    } else if !seg.is_contiguous() {
                        ctx.report("Inconsistent information in CMAP segment");
                    }
                });
                let out_of_order = self.segments.windows(2).any(|pair| {
                    matches!(
                        (pair[0].end_code(), pair[1].start_code()),
                        (Some(end), Some(start)) if end >= start
                    )
                });
                if out_of_order {
                    ctx.report("segments must be sorted and must not overlap");
                }
            });
            if self.seg_count() * 2 > u16::MAX as usize {
                ctx.report("too many segments");
            }
            if self.compute_length() > u16::MAX as usize {
                ctx.report("subtable is too large for a 16-bit length");
            }
        })
    }
}
