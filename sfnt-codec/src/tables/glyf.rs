//! The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table

use font_types::{GlyphId16, Tag};

use crate::{
    error::Error,
    font_data::{Cursor, FontData},
    read::{FontRead, ReadError},
    tables::{loca::Loca, TopLevelTable},
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

mod composite;
mod simple;

pub use composite::{
    Anchor, Component, ComponentFlags, CompositeGlyph, CompositeGlyphFlags, Transform,
};
pub use simple::{CurvePoint, SimpleGlyph, SimpleGlyphFlags};

/// A Bounding box.
///
/// For simple glyphs this is the extent of all points, on- and off-curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bbox {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

/// The [glyf] table: one outline per glyph.
///
/// Offsets into this table live in [`Loca`], which is regenerated from the
/// glyphs whenever the font is encoded.
///
/// [glyf]: https://docs.microsoft.com/en-us/typography/opentype/spec/glyf
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glyf {
    pub glyphs: Vec<Glyph>,
}

/// A single glyph outline.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Glyph {
    Empty(EmptyGlyph),
    Simple(SimpleGlyph),
    Composite(CompositeGlyph),
}

/// A glyph with no outline.
///
/// Most such glyphs have no data at all (a zero-length `loca` range). A
/// record with zero contours still has a bounding box, which is kept so the
/// glyph is written back as it was.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmptyGlyph {
    pub bbox: Option<Bbox>,
}

impl TopLevelTable for Glyf {
    const TAG: Tag = Tag::new(b"glyf");
}

impl Bbox {
    pub fn union(self, other: Bbox) -> Bbox {
        Bbox {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    pub(crate) fn read_from(cursor: &mut Cursor<'_>) -> Result<Self, ReadError> {
        Ok(Bbox {
            x_min: cursor.read()?,
            y_min: cursor.read()?,
            x_max: cursor.read()?,
            y_max: cursor.read()?,
        })
    }
}

impl FontWrite for Bbox {
    fn write_into(&self, writer: &mut TableWriter) {
        let Bbox {
            x_min,
            y_min,
            x_max,
            y_max,
        } = *self;
        [x_min, y_min, x_max, y_max].write_into(writer)
    }
}

impl Glyph {
    /// The glyph's bounding box, if it has one.
    pub fn bbox(&self) -> Option<Bbox> {
        match self {
            Glyph::Empty(empty) => empty.bbox,
            Glyph::Simple(simple) => Some(simple.bbox),
            Glyph::Composite(composite) => Some(composite.bbox),
        }
    }

    /// The value written in the glyph header; `-1` for composites.
    pub fn number_of_contours(&self) -> i16 {
        match self {
            Glyph::Empty(_) => 0,
            Glyph::Simple(simple) => simple.end_pts_of_contours.len() as i16,
            Glyph::Composite(_) => -1,
        }
    }

    /// `true` if this glyph will be written with no data.
    pub fn is_empty(&self) -> bool {
        matches!(self, Glyph::Empty(EmptyGlyph { bbox: None }))
    }
}

impl FontRead for Glyph {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        if data.is_empty() {
            return Ok(Glyph::Empty(EmptyGlyph::default()));
        }
        let mut cursor = data.cursor();
        let mark = cursor.mark();
        let n_contours: i16 = cursor.read()?;
        match n_contours {
            0 => {
                let bbox = Bbox::read_from(&mut cursor)?;
                Ok(Glyph::Empty(EmptyGlyph { bbox: Some(bbox) }))
            }
            n if n > 0 => {
                cursor.reset(mark);
                SimpleGlyph::read_from(&mut cursor).map(Glyph::Simple)
            }
            _ => {
                cursor.reset(mark);
                CompositeGlyph::read_from(&mut cursor).map(Glyph::Composite)
            }
        }
    }
}

impl FontWrite for Glyph {
    fn write_into(&self, writer: &mut TableWriter) {
        match self {
            Glyph::Empty(EmptyGlyph { bbox: None }) => (),
            Glyph::Empty(EmptyGlyph { bbox: Some(bbox) }) => {
                0i16.write_into(writer);
                bbox.write_into(writer);
            }
            Glyph::Simple(simple) => simple.write_into(writer),
            Glyph::Composite(composite) => composite.write_into(writer),
        }
    }
}

impl Validate for Glyph {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        match self {
            Glyph::Empty(_) => (),
            Glyph::Simple(simple) => simple.validate_impl(ctx),
            Glyph::Composite(composite) => composite.validate_impl(ctx),
        }
    }
}

impl From<SimpleGlyph> for Glyph {
    fn from(value: SimpleGlyph) -> Self {
        Glyph::Simple(value)
    }
}

impl From<CompositeGlyph> for Glyph {
    fn from(value: CompositeGlyph) -> Self {
        Glyph::Composite(value)
    }
}

impl Glyf {
    pub fn new(glyphs: Vec<Glyph>) -> Self {
        Glyf { glyphs }
    }

    pub fn get(&self, gid: GlyphId16) -> Option<&Glyph> {
        self.glyphs.get(gid.to_u16() as usize)
    }

    /// Decode every glyph located by `loca`.
    ///
    /// `num_glyphs` is the count from `maxp`; it must agree with the number
    /// of glyphs in `loca`.
    pub fn read_with_loca(
        data: FontData<'_>,
        loca: &Loca,
        num_glyphs: u16,
    ) -> Result<Self, ReadError> {
        if loca.num_glyphs() != num_glyphs as usize || loca.offsets.is_empty() {
            return Err(ReadError::GlyphCountMismatch {
                loca: loca.num_glyphs(),
                num_glyphs,
            });
        }
        let glyphs = (0..num_glyphs)
            .map(|gid| {
                let range = loca
                    .glyph_range(gid)
                    .ok_or(ReadError::OutOfBounds)?;
                if range.start > range.end {
                    return Err(ReadError::MalformedData("loca offsets are not sorted"));
                }
                let glyph_data = data.slice(range).ok_or(ReadError::OutOfBounds)?;
                Glyph::read(glyph_data)
            })
            .collect::<Result<_, _>>()?;
        Ok(Glyf { glyphs })
    }

    /// Serialize the glyphs, returning the table data and the `loca` offsets.
    ///
    /// Each glyph is padded to an even length, so the offsets can always be
    /// stored in the short `loca` format if the table is small enough.
    pub fn compile(&self) -> Result<(Vec<u8>, Vec<u32>), Error> {
        self.validate()?;
        let mut bytes = Vec::new();
        let mut offsets = Vec::with_capacity(self.glyphs.len() + 1);
        offsets.push(0);
        for glyph in &self.glyphs {
            let mut writer = TableWriter::default();
            glyph.write_into(&mut writer);
            writer.pad_to_2byte_aligned();
            bytes.extend(writer.into_data());
            offsets.push(bytes.len() as u32);
        }
        Ok((bytes, offsets))
    }
}

impl FontWrite for Glyf {
    fn write_into(&self, writer: &mut TableWriter) {
        for glyph in &self.glyphs {
            glyph.write_into(writer);
            writer.pad_to_2byte_aligned();
        }
    }
}

impl Validate for Glyf {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("glyf", |ctx| {
            if self.glyphs.len() > u16::MAX as usize {
                ctx.report("too many glyphs");
            }
            ctx.in_field("glyphs", |ctx| {
                ctx.in_array(&self.glyphs, |ctx, glyph| glyph.validate_impl(ctx))
            });
        });
        let num_glyphs = self.glyphs.len();
        for (gid, glyph) in self.glyphs.iter().enumerate() {
            if let Glyph::Composite(composite) = glyph {
                for component in &composite.components {
                    if component.glyph.to_u16() as usize >= num_glyphs {
                        log::warn!(
                            "glyph {gid} references missing component {}",
                            component.glyph
                        );
                    }
                }
            }
        }
    }
}
