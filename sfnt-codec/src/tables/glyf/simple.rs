//! Simple glyphs (glyphs which do not contain components)

use crate::{
    font_data::{Cursor, FontData},
    read::{FontRead, ReadError},
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

use super::Bbox;

bitflags::bitflags! {
    /// Flags describing a single point of a [`SimpleGlyph`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SimpleGlyphFlags: u8 {
        const ON_CURVE_POINT = 0x01;
        const X_SHORT_VECTOR = 0x02;
        const Y_SHORT_VECTOR = 0x04;
        const REPEAT_FLAG = 0x08;
        const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR = 0x10;
        const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR = 0x20;
        const OVERLAP_SIMPLE = 0x40;
        const CUBIC = 0x80;
    }
}

/// A simple (without components) glyph
///
/// Points are stored as parallel arrays of flags and absolute coordinates.
/// The flags describe how each coordinate is encoded, and are written as-is;
/// use [`SimpleGlyph::from_contours`] to derive them from a list of points.
///
/// When decoding, the repeat bit is removed from each flag (repeats are an
/// encoding detail) and [`OVERLAP_SIMPLE`] is set on the first point of every
/// contour.
///
/// [`OVERLAP_SIMPLE`]: SimpleGlyphFlags::OVERLAP_SIMPLE
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleGlyph {
    pub bbox: Bbox,
    /// The index of the last point of each contour.
    pub end_pts_of_contours: Vec<u16>,
    pub instructions: Vec<u8>,
    pub flags: Vec<SimpleGlyphFlags>,
    pub x_coords: Vec<i32>,
    pub y_coords: Vec<i32>,
}

/// A point in a glyph outline, with an on-curve flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CurvePoint {
    pub x: i32,
    pub y: i32,
    pub on_curve: bool,
}

impl CurvePoint {
    pub fn new(x: i32, y: i32, on_curve: bool) -> Self {
        CurvePoint { x, y, on_curve }
    }

    pub fn on_curve(x: i32, y: i32) -> Self {
        Self::new(x, y, true)
    }

    pub fn off_curve(x: i32, y: i32) -> Self {
        Self::new(x, y, false)
    }
}

/// How a single coordinate delta is stored
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CoordDelta {
    // the 'same' bit is set and so we write nothing
    Skip,
    Short(u8),
    Long(i16),
}

impl FontWrite for CoordDelta {
    fn write_into(&self, writer: &mut TableWriter) {
        match self {
            CoordDelta::Skip => (),
            CoordDelta::Short(val) => val.write_into(writer),
            CoordDelta::Long(val) => val.write_into(writer),
        }
    }
}

impl CoordDelta {
    /// The encoding of `delta` dictated by `flag`, or `None` if the flag
    /// cannot represent it.
    fn for_flag(
        delta: i32,
        flag: SimpleGlyphFlags,
        short: SimpleGlyphFlags,
        same_or_pos: SimpleGlyphFlags,
    ) -> Option<CoordDelta> {
        match (flag.contains(short), flag.contains(same_or_pos)) {
            (true, true) => u8::try_from(delta).ok().map(CoordDelta::Short),
            (true, false) if delta <= 0 => u8::try_from(-delta).ok().map(CoordDelta::Short),
            (true, false) => None,
            (false, true) => (delta == 0).then_some(CoordDelta::Skip),
            (false, false) => i16::try_from(delta).ok().map(CoordDelta::Long),
        }
    }
}

/// The smallest encoding for a delta, as flag bits.
fn flag_for_delta(
    delta: i32,
    short: SimpleGlyphFlags,
    same_or_pos: SimpleGlyphFlags,
) -> SimpleGlyphFlags {
    const SHORT_MAX: i32 = u8::MAX as i32;
    const SHORT_MIN: i32 = -SHORT_MAX;
    match delta {
        0 => same_or_pos,
        SHORT_MIN..=-1 => short,
        1..=SHORT_MAX => short | same_or_pos,
        _ => SimpleGlyphFlags::empty(),
    }
}

impl SimpleGlyph {
    /// Build a glyph from a list of contours, deriving the flags and the
    /// bounding box.
    ///
    /// The first point of each contour gets [`OVERLAP_SIMPLE`], matching what
    /// decoding produces.
    ///
    /// [`OVERLAP_SIMPLE`]: SimpleGlyphFlags::OVERLAP_SIMPLE
    pub fn from_contours(contours: &[Vec<CurvePoint>], instructions: Vec<u8>) -> Self {
        let mut glyph = SimpleGlyph {
            instructions,
            ..Default::default()
        };
        let (mut last_x, mut last_y) = (0, 0);
        for contour in contours.iter().filter(|c| !c.is_empty()) {
            for (i, point) in contour.iter().enumerate() {
                let mut flag = flag_for_delta(
                    point.x - last_x,
                    SimpleGlyphFlags::X_SHORT_VECTOR,
                    SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
                ) | flag_for_delta(
                    point.y - last_y,
                    SimpleGlyphFlags::Y_SHORT_VECTOR,
                    SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
                );
                if point.on_curve {
                    flag |= SimpleGlyphFlags::ON_CURVE_POINT;
                }
                if i == 0 {
                    flag |= SimpleGlyphFlags::OVERLAP_SIMPLE;
                }
                glyph.flags.push(flag);
                glyph.x_coords.push(point.x);
                glyph.y_coords.push(point.y);
                (last_x, last_y) = (point.x, point.y);
            }
            glyph
                .end_pts_of_contours
                .push(glyph.flags.len().saturating_sub(1) as u16);
        }
        glyph.recompute_bounding_box();
        glyph
    }

    /// The number of points, as implied by the contour end points.
    pub fn num_points(&self) -> usize {
        self.end_pts_of_contours
            .last()
            .map(|last| *last as usize + 1)
            .unwrap_or_default()
    }

    /// Iterate over the points of all contours, in order.
    pub fn points(&self) -> impl Iterator<Item = CurvePoint> + '_ {
        self.flags
            .iter()
            .zip(self.x_coords.iter().zip(&self.y_coords))
            .map(|(flag, (x, y))| {
                CurvePoint::new(*x, *y, flag.contains(SimpleGlyphFlags::ON_CURVE_POINT))
            })
    }

    /// The points of each contour.
    pub fn contours(&self) -> Vec<Vec<CurvePoint>> {
        let points = self.points().collect::<Vec<_>>();
        let mut start = 0;
        let mut contours = Vec::with_capacity(self.end_pts_of_contours.len());
        for end in &self.end_pts_of_contours {
            let end = (*end as usize + 1).min(points.len());
            contours.push(points.get(start..end).unwrap_or_default().to_vec());
            start = end;
        }
        contours
    }

    /// Set the bounding box to the extent of the points.
    ///
    /// Off-curve points are included, as TrueType requires.
    pub fn recompute_bounding_box(&mut self) {
        let clamp = |v: i32| v.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        let x_range = self.x_coords.iter().copied().fold(None, min_max);
        let y_range = self.y_coords.iter().copied().fold(None, min_max);
        self.bbox = match (x_range, y_range) {
            (Some((x_min, x_max)), Some((y_min, y_max))) => Bbox {
                x_min: clamp(x_min),
                y_min: clamp(y_min),
                x_max: clamp(x_max),
                y_max: clamp(y_max),
            },
            _ => Bbox::default(),
        };
    }

    pub(crate) fn read_from(cursor: &mut Cursor<'_>) -> Result<Self, ReadError> {
        let n_contours: i16 = cursor.read()?;
        if n_contours < 0 {
            return Err(ReadError::MalformedData("simple glyph has negative contour count"));
        }
        let bbox = Bbox::read_from(cursor)?;
        let end_pts_of_contours: Vec<u16> = cursor.read_array(n_contours as usize)?;
        let n_instructions: u16 = cursor.read()?;
        let instructions = cursor.read_bytes(n_instructions as usize)?.to_vec();
        let n_points = end_pts_of_contours
            .last()
            .map(|last| *last as usize + 1)
            .unwrap_or_default();

        let mut flags = Vec::with_capacity(n_points.min(cursor.remaining_len()));
        while flags.len() < n_points {
            let flag = SimpleGlyphFlags::from_bits_retain(cursor.read()?);
            let count = if flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
                cursor.read::<u8>()? as usize + 1
            } else {
                1
            };
            // a repeat that runs past the last point is truncated
            let count = count.min(n_points - flags.len());
            let flag = flag - SimpleGlyphFlags::REPEAT_FLAG;
            flags.extend(std::iter::repeat(flag).take(count));
        }

        let contour_starts = std::iter::once(0)
            .chain(end_pts_of_contours.iter().map(|end| *end as usize + 1));
        for start in contour_starts {
            if let Some(flag) = flags.get_mut(start) {
                *flag |= SimpleGlyphFlags::OVERLAP_SIMPLE;
            }
        }

        let x_coords = read_coords(
            cursor,
            &flags,
            SimpleGlyphFlags::X_SHORT_VECTOR,
            SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
        )?;
        let y_coords = read_coords(
            cursor,
            &flags,
            SimpleGlyphFlags::Y_SHORT_VECTOR,
            SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
        )?;

        Ok(SimpleGlyph {
            bbox,
            end_pts_of_contours,
            instructions,
            flags,
            x_coords,
            y_coords,
        })
    }

    fn coord_deltas<'a>(
        coords: &'a [i32],
        flags: &'a [SimpleGlyphFlags],
        short: SimpleGlyphFlags,
        same_or_pos: SimpleGlyphFlags,
    ) -> impl Iterator<Item = Option<CoordDelta>> + 'a {
        let mut last = 0;
        coords.iter().zip(flags).map(move |(coord, flag)| {
            let delta = coord - last;
            last = *coord;
            CoordDelta::for_flag(delta, *flag, short, same_or_pos)
        })
    }
}

fn min_max(acc: Option<(i32, i32)>, value: i32) -> Option<(i32, i32)> {
    Some(match acc {
        None => (value, value),
        Some((min, max)) => (min.min(value), max.max(value)),
    })
}

fn read_coords(
    cursor: &mut Cursor<'_>,
    flags: &[SimpleGlyphFlags],
    short: SimpleGlyphFlags,
    same_or_pos: SimpleGlyphFlags,
) -> Result<Vec<i32>, ReadError> {
    let mut value = 0i32;
    let mut coords = Vec::with_capacity(flags.len());
    for flag in flags {
        let delta = match (flag.contains(short), flag.contains(same_or_pos)) {
            (true, true) => cursor.read::<u8>()? as i32,
            (true, false) => -(cursor.read::<u8>()? as i32),
            (false, true) => 0,
            (false, false) => cursor.read::<i16>()? as i32,
        };
        value = value.wrapping_add(delta);
        coords.push(value);
    }
    Ok(coords)
}

impl FontRead for SimpleGlyph {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        Self::read_from(&mut data.cursor())
    }
}

impl FontWrite for SimpleGlyph {
    fn write_into(&self, writer: &mut TableWriter) {
        (self.end_pts_of_contours.len() as i16).write_into(writer);
        self.bbox.write_into(writer);
        self.end_pts_of_contours.write_into(writer);
        (self.instructions.len() as u16).write_into(writer);
        writer.write_slice(&self.instructions);

        RepeatableFlag::iter_from_flags(
            self.flags
                .iter()
                .map(|flag| *flag - SimpleGlyphFlags::REPEAT_FLAG),
        )
        .for_each(|flag| flag.write_into(writer));

        for (coords, short, same) in [
            (
                &self.x_coords,
                SimpleGlyphFlags::X_SHORT_VECTOR,
                SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
            ),
            (
                &self.y_coords,
                SimpleGlyphFlags::Y_SHORT_VECTOR,
                SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
            ),
        ] {
            // validation guarantees every delta is representable
            Self::coord_deltas(coords, &self.flags, short, same)
                .flatten()
                .for_each(|delta| delta.write_into(writer));
        }
        writer.pad_to_2byte_aligned();
    }
}

impl Validate for SimpleGlyph {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("SimpleGlyph", |ctx| {
            let n_points = self.num_points();
            ctx.in_field("end_pts_of_contours", |ctx| {
                if self.end_pts_of_contours.is_empty() {
                    ctx.report("a simple glyph must have at least one contour");
                }
                if self.end_pts_of_contours.len() > i16::MAX as usize {
                    ctx.report("too many contours");
                }
                if self.end_pts_of_contours.windows(2).any(|w| w[0] >= w[1]) {
                    ctx.report("contour end points must be strictly increasing");
                }
            });
            ctx.in_field("instructions", |ctx| {
                if self.instructions.len() > u16::MAX as usize {
                    ctx.report("instructions len overflows");
                }
            });
            for (name, len) in [
                ("flags", self.flags.len()),
                ("x_coords", self.x_coords.len()),
                ("y_coords", self.y_coords.len()),
            ] {
                ctx.in_field(name, |ctx| {
                    if len != n_points {
                        ctx.report(format!(
                            "expected {n_points} values (last end point + 1), found {len}"
                        ));
                    }
                });
            }
            for (name, coords, short, same) in [
                (
                    "x_coords",
                    &self.x_coords,
                    SimpleGlyphFlags::X_SHORT_VECTOR,
                    SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
                ),
                (
                    "y_coords",
                    &self.y_coords,
                    SimpleGlyphFlags::Y_SHORT_VECTOR,
                    SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
                ),
            ] {
                ctx.in_field(name, |ctx| {
                    let bad = Self::coord_deltas(coords, &self.flags, short, same)
                        .position(|delta| delta.is_none());
                    if let Some(idx) = bad {
                        ctx.report(format!("point {idx} cannot be encoded with its flag"));
                    }
                });
            }
        })
    }
}

/// A little helper for writing flags that may have a 'repeat' byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RepeatableFlag {
    flag: SimpleGlyphFlags,
    repeat: u8,
}

impl FontWrite for RepeatableFlag {
    fn write_into(&self, writer: &mut TableWriter) {
        debug_assert_eq!(
            self.flag.contains(SimpleGlyphFlags::REPEAT_FLAG),
            self.repeat > 0
        );

        self.flag.bits().write_into(writer);
        if self.flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
            self.repeat.write_into(writer);
        }
    }
}

impl RepeatableFlag {
    /// given an iterator over raw flags, return an iterator over flags + repeat values
    ///
    /// Runs are collected greedily: any flag equal to its predecessor extends
    /// the current run, up to a repeat count of 255.
    fn iter_from_flags(
        flags: impl IntoIterator<Item = SimpleGlyphFlags>,
    ) -> impl Iterator<Item = RepeatableFlag> {
        let mut iter = flags.into_iter();
        let mut prev: Option<RepeatableFlag> = None;

        std::iter::from_fn(move || loop {
            match (iter.next(), prev.take()) {
                (None, last) => return last,
                (Some(flag), None) => prev = Some(RepeatableFlag { flag, repeat: 0 }),
                (Some(flag), Some(mut last)) => {
                    if (last.flag - SimpleGlyphFlags::REPEAT_FLAG) == flag
                        && last.repeat < u8::MAX
                    {
                        last.repeat += 1;
                        last.flag |= SimpleGlyphFlags::REPEAT_FLAG;
                        prev = Some(last);
                    } else {
                        prev = Some(RepeatableFlag { flag, repeat: 0 });
                        return Some(last);
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flags(raw: &[u8]) -> Vec<SimpleGlyphFlags> {
        raw.iter()
            .copied()
            .map(SimpleGlyphFlags::from_bits_retain)
            .collect()
    }

    #[test]
    fn decode_simple_glyph() {
        let glyph =
            SimpleGlyph::read(FontData::new(font_test_data::glyf::SIMPLE_GLYPH)).unwrap();
        assert_eq!(glyph.end_pts_of_contours, [5]);
        assert_eq!(glyph.instructions, [0xB0, 0x01]);
        assert_eq!(glyph.x_coords, [100, 100, 120, 140, 160, 500]);
        assert_eq!(glyph.y_coords, [0, 700, 710, 720, 730, 0]);
        // the repeat bit is dropped from the three expanded 0x36 flags
        assert_eq!(glyph.flags, flags(&[0x73, 0x11, 0x36, 0x36, 0x36, 0x01]));
        assert_eq!(
            glyph.bbox,
            Bbox {
                x_min: 100,
                y_min: 0,
                x_max: 500,
                y_max: 730
            }
        );
        let on_curve = glyph.points().map(|pt| pt.on_curve).collect::<Vec<_>>();
        assert_eq!(on_curve, [true, true, false, false, false, true]);
    }

    #[test]
    fn decode_then_encode_is_identity() {
        let glyph =
            SimpleGlyph::read(FontData::new(font_test_data::glyf::SIMPLE_GLYPH)).unwrap();
        let dumped = crate::write::dump_table(&glyph).unwrap();
        assert_eq!(dumped, font_test_data::glyf::SIMPLE_GLYPH);
    }

    // Decoding sets OVERLAP_SIMPLE on the first point of each contour, even
    // if the source data did not. This is intentional: the bit only carries
    // overlap metadata, and normalizing it keeps decoded glyphs comparable.
    #[test]
    fn decode_sets_overlap_on_contour_starts() {
        let glyph = SimpleGlyph::from_contours(
            &[
                vec![CurvePoint::on_curve(0, 0), CurvePoint::on_curve(10, 0)],
                vec![CurvePoint::on_curve(10, 10), CurvePoint::off_curve(0, 10)],
            ],
            Vec::new(),
        );
        let mut stripped = glyph.clone();
        for flag in stripped.flags.iter_mut() {
            *flag -= SimpleGlyphFlags::OVERLAP_SIMPLE;
        }
        let dumped = crate::write::dump_table(&stripped).unwrap();
        let loaded = SimpleGlyph::read(FontData::new(&dumped)).unwrap();
        let overlap = loaded
            .flags
            .iter()
            .map(|flag| flag.contains(SimpleGlyphFlags::OVERLAP_SIMPLE))
            .collect::<Vec<_>>();
        assert_eq!(overlap, [true, false, true, false]);
        assert_eq!(loaded, glyph);
    }

    #[test]
    fn mixed_short_and_long_roundtrip() {
        let glyph = SimpleGlyph::from_contours(
            &[vec![
                CurvePoint::on_curve(0, 0),
                CurvePoint::on_curve(0, 0),
                CurvePoint::off_curve(-255, 255),
                CurvePoint::on_curve(1000, -1000),
                CurvePoint::on_curve(1000, -1000),
                CurvePoint::on_curve(1000, -1000),
                CurvePoint::off_curve(-30000, 30000),
                CurvePoint::on_curve(-29999, 29999),
            ]],
            vec![1, 2, 3],
        );
        let dumped = crate::write::dump_table(&glyph).unwrap();
        assert_eq!(dumped.len() % 2, 0);
        let loaded = SimpleGlyph::read(FontData::new(&dumped)).unwrap();
        assert_eq!(loaded, glyph);
    }

    #[test]
    fn random_glyphs_roundtrip() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x676c7966);
        for _ in 0..50 {
            let n_contours = rng.gen_range(1..5);
            let contours = (0..n_contours)
                .map(|_| {
                    (0..rng.gen_range(1..20))
                        .map(|_| {
                            // bias towards small values so short vectors and
                            // repeats are exercised
                            let range = if rng.gen_bool(0.5) { 300 } else { 5000 };
                            CurvePoint::new(
                                rng.gen_range(-range..range),
                                rng.gen_range(-range..range),
                                rng.gen(),
                            )
                        })
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>();
            let glyph = SimpleGlyph::from_contours(&contours, Vec::new());
            let dumped = crate::write::dump_table(&glyph).unwrap();
            let loaded = SimpleGlyph::read(FontData::new(&dumped)).unwrap();
            assert_eq!(loaded, glyph);
            assert_eq!(loaded.contours(), contours);
        }
    }

    #[test]
    fn mismatched_lengths_are_fatal() {
        let mut glyph = SimpleGlyph::from_contours(
            &[vec![CurvePoint::on_curve(0, 0), CurvePoint::on_curve(1, 1)]],
            Vec::new(),
        );
        glyph.y_coords.pop();
        let err = crate::write::dump_table(&glyph).unwrap_err();
        let crate::error::Error::ValidationFailed(report) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(report.len(), 1, "{report}");
    }

    #[test]
    fn flag_must_match_coordinate() {
        let mut glyph = SimpleGlyph::from_contours(
            &[vec![CurvePoint::on_curve(0, 0), CurvePoint::on_curve(1, 1)]],
            Vec::new(),
        );
        // now needs a long vector, but the flag says short
        glyph.x_coords[1] = 1000;
        assert!(crate::write::dump_table(&glyph).is_err());
    }

    #[test]
    fn repeat_flags() {
        let raw = [1u8, 1, 1, 2, 2, 3, 1, 1];
        let r_flags = RepeatableFlag::iter_from_flags(flags(&raw)).collect::<Vec<_>>();
        let rf = |flag: u8, repeat| RepeatableFlag {
            flag: SimpleGlyphFlags::from_bits_retain(flag),
            repeat,
        };
        assert_eq!(
            r_flags,
            [rf(0x09, 2), rf(0x0A, 1), rf(3, 0), rf(0x09, 1)]
        );
    }

    #[test]
    fn flag_pair_is_written_as_repeat() {
        let glyph = SimpleGlyph::from_contours(
            &[vec![
                CurvePoint::on_curve(0, 0),
                CurvePoint::on_curve(0, 0),
                CurvePoint::on_curve(0, 0),
            ]],
            Vec::new(),
        );
        let dumped = crate::write::dump_table(&glyph).unwrap();
        // header, one end point, no instructions, then the flags
        assert_eq!(dumped[14..], [0x71, 0x39, 0x01, 0x00]);
        assert_eq!(SimpleGlyph::read(FontData::new(&dumped)).unwrap(), glyph);
    }

    #[test]
    fn negative_short_deltas_stop_at_255() {
        let glyph = SimpleGlyph::from_contours(
            &[vec![
                CurvePoint::on_curve(0, 0),
                CurvePoint::on_curve(-255, 0),
                CurvePoint::on_curve(-511, 0),
            ]],
            Vec::new(),
        );
        let dumped = crate::write::dump_table(&glyph).unwrap();
        // flags, then x as one byte for -255 and a word for -256
        assert_eq!(dumped[14..], [0x71, 0x23, 0x21, 0xFF, 0xFF, 0x00]);
        assert_eq!(SimpleGlyph::read(FontData::new(&dumped)).unwrap(), glyph);
    }

    #[test]
    fn long_repeat_run_is_split() {
        let raw = vec![1u8; 300];
        let r_flags = RepeatableFlag::iter_from_flags(flags(&raw)).collect::<Vec<_>>();
        assert_eq!(r_flags.len(), 2);
        assert_eq!(r_flags[0].repeat, 255);
        assert_eq!(r_flags[1].repeat, 43);
    }

    #[test]
    fn excess_repeat_is_truncated() {
        #[rustfmt::skip]
        let data = [
            0x00, 0x01, // one contour
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // bbox
            0x00, 0x01, // last point is 1
            0x00, 0x00, // no instructions
            0x39, 0x05, // on-curve, x same, y same, repeat 5 times
        ];
        let glyph = SimpleGlyph::read(FontData::new(&data)).unwrap();
        assert_eq!(glyph.flags.len(), 2);
        assert_eq!(glyph.x_coords, [0, 0]);
    }

    #[test]
    fn truncated_coordinates() {
        let data = &font_test_data::glyf::SIMPLE_GLYPH[..22];
        assert_eq!(
            SimpleGlyph::read(FontData::new(data)),
            Err(ReadError::OutOfBounds)
        );
    }
}
