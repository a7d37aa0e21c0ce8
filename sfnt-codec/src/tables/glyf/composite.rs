//! Composite glyphs (containing other glyphs as components)

use font_types::{F2Dot14, GlyphId16};

use crate::{
    font_data::{Cursor, FontData},
    read::{FontRead, ReadError},
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

use super::Bbox;

bitflags::bitflags! {
    /// Flags stored with each component of a [`CompositeGlyph`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CompositeGlyphFlags: u16 {
        /// The arguments are 16-bit; otherwise they are bytes.
        const ARG_1_AND_2_ARE_WORDS = 0x0001;
        /// The arguments are signed xy offsets, otherwise unsigned point numbers.
        const ARGS_ARE_XY_VALUES = 0x0002;
        const ROUND_XY_TO_GRID = 0x0004;
        const WE_HAVE_A_SCALE = 0x0008;
        const MORE_COMPONENTS = 0x0020;
        const WE_HAVE_AN_X_AND_Y_SCALE = 0x0040;
        const WE_HAVE_A_TWO_BY_TWO = 0x0080;
        const WE_HAVE_INSTRUCTIONS = 0x0100;
        const USE_MY_METRICS = 0x0200;
        const OVERLAP_COMPOUND = 0x0400;
        const SCALED_COMPONENT_OFFSET = 0x0800;
        const UNSCALED_COMPONENT_OFFSET = 0x1000;
    }
}

/// A glyph made up of other glyphs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositeGlyph {
    pub bbox: Bbox,
    pub components: Vec<Component>,
    pub instructions: Vec<u8>,
}

/// A reference to another glyph, with a placement and transform.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    pub glyph: GlyphId16,
    pub anchor: Anchor,
    pub transform: Transform,
    pub flags: ComponentFlags,
}

/// How a component is positioned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Anchor {
    /// The component is offset by this amount.
    Offset { x: i16, y: i16 },
    /// A point in the component is aligned with a point in the parent.
    Point { base: u16, component: u16 },
}

/// A 2x2 transform applied to a component.
///
/// The four values are read and written in the order `xx, yx, xy, yy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub xx: F2Dot14,
    pub yx: F2Dot14,
    pub xy: F2Dot14,
    pub yy: F2Dot14,
}

/// Component flags that are not derived from the component's data.
///
/// These are preserved when a glyph is decoded and encoded again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentFlags {
    pub round_xy_to_grid: bool,
    pub use_my_metrics: bool,
    pub scaled_component_offset: bool,
    pub unscaled_component_offset: bool,
    pub overlap_compound: bool,
}

impl Default for Anchor {
    fn default() -> Self {
        Anchor::Offset { x: 0, y: 0 }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            xx: F2Dot14::ONE,
            yx: F2Dot14::ZERO,
            xy: F2Dot14::ZERO,
            yy: F2Dot14::ONE,
        }
    }
}

impl Anchor {
    /// The flags implied by the anchor type and the size of its values.
    pub fn compute_flags(&self) -> CompositeGlyphFlags {
        const I8_RANGE: std::ops::RangeInclusive<i16> = i8::MIN as i16..=i8::MAX as i16;
        match self {
            Anchor::Offset { x, y } => {
                let words = if I8_RANGE.contains(x) && I8_RANGE.contains(y) {
                    CompositeGlyphFlags::empty()
                } else {
                    CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS
                };
                words | CompositeGlyphFlags::ARGS_ARE_XY_VALUES
            }
            Anchor::Point { base, component } => {
                if *base <= u8::MAX as u16 && *component <= u8::MAX as u16 {
                    CompositeGlyphFlags::empty()
                } else {
                    CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS
                }
            }
        }
    }

    fn read_from(cursor: &mut Cursor<'_>, flags: CompositeGlyphFlags) -> Result<Self, ReadError> {
        let words = flags.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS);
        let anchor = if flags.contains(CompositeGlyphFlags::ARGS_ARE_XY_VALUES) {
            let (x, y) = if words {
                (cursor.read::<i16>()?, cursor.read::<i16>()?)
            } else {
                (cursor.read::<i8>()? as i16, cursor.read::<i8>()? as i16)
            };
            Anchor::Offset { x, y }
        } else {
            let (base, component) = if words {
                (cursor.read::<u16>()?, cursor.read::<u16>()?)
            } else {
                (cursor.read::<u8>()? as u16, cursor.read::<u8>()? as u16)
            };
            Anchor::Point { base, component }
        };
        Ok(anchor)
    }
}

impl Transform {
    /// The scale flags needed to store this transform.
    pub fn compute_flags(&self) -> CompositeGlyphFlags {
        if self.yx != F2Dot14::ZERO || self.xy != F2Dot14::ZERO {
            CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO
        } else if self.xx != self.yy {
            CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE
        } else if self.xx != F2Dot14::ONE {
            CompositeGlyphFlags::WE_HAVE_A_SCALE
        } else {
            CompositeGlyphFlags::empty()
        }
    }

    fn read_from(cursor: &mut Cursor<'_>, flags: CompositeGlyphFlags) -> Result<Self, ReadError> {
        let mut transform = Transform::default();
        if flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
            transform.xx = cursor.read()?;
            transform.yy = transform.xx;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            transform.xx = cursor.read()?;
            transform.yy = cursor.read()?;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
            transform.xx = cursor.read()?;
            transform.yx = cursor.read()?;
            transform.xy = cursor.read()?;
            transform.yy = cursor.read()?;
        }
        Ok(transform)
    }
}

impl Component {
    pub fn new(
        glyph: GlyphId16,
        anchor: Anchor,
        transform: Transform,
        flags: impl Into<ComponentFlags>,
    ) -> Self {
        Component {
            glyph,
            anchor,
            transform,
            flags: flags.into(),
        }
    }

    /// The component's affine matrix `[a, b, c, d, e, f]`, mapping
    /// `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
    ///
    /// Point-aligned components have no fixed offset, so `e` and `f` are zero.
    pub fn matrix(&self) -> [f32; 6] {
        let (e, f) = match self.anchor {
            Anchor::Offset { x, y } => (x as f32, y as f32),
            Anchor::Point { .. } => (0.0, 0.0),
        };
        [
            self.transform.xx.to_f32(),
            self.transform.yx.to_f32(),
            self.transform.xy.to_f32(),
            self.transform.yy.to_f32(),
            e,
            f,
        ]
    }

    fn compute_flag(&self) -> CompositeGlyphFlags {
        self.anchor.compute_flags() | self.transform.compute_flags() | self.flags.into()
    }

    fn write_into(&self, writer: &mut TableWriter, extra_flags: CompositeGlyphFlags) {
        let flags = self.compute_flag() | extra_flags;
        flags.bits().write_into(writer);
        self.glyph.write_into(writer);
        self.anchor.write_into(writer);
        self.transform.write_into(writer);
    }
}

impl CompositeGlyph {
    /// Create a composite from components, with the bounding box of the
    /// union of the component boxes.
    pub fn new(components: Vec<Component>, bbox: Bbox) -> Self {
        CompositeGlyph {
            bbox,
            components,
            instructions: Vec::new(),
        }
    }

    pub(crate) fn read_from(cursor: &mut Cursor<'_>) -> Result<Self, ReadError> {
        let n_contours: i16 = cursor.read()?;
        if n_contours >= 0 {
            return Err(ReadError::MalformedData("composite glyph has non-negative contour count"));
        }
        let bbox = Bbox::read_from(cursor)?;
        let mut components = Vec::new();
        let mut has_instructions = false;
        loop {
            let flags = CompositeGlyphFlags::from_bits_retain(cursor.read()?);
            let glyph = cursor.read()?;
            let anchor = Anchor::read_from(cursor, flags)?;
            let transform = Transform::read_from(cursor, flags)?;
            components.push(Component {
                glyph,
                anchor,
                transform,
                flags: flags.into(),
            });
            has_instructions |= flags.contains(CompositeGlyphFlags::WE_HAVE_INSTRUCTIONS);
            if !flags.contains(CompositeGlyphFlags::MORE_COMPONENTS) {
                break;
            }
        }
        let instructions = if has_instructions {
            let len: u16 = cursor.read()?;
            cursor.read_bytes(len as usize)?.to_vec()
        } else {
            Vec::new()
        };
        Ok(CompositeGlyph {
            bbox,
            components,
            instructions,
        })
    }
}

impl FontRead for CompositeGlyph {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        Self::read_from(&mut data.cursor())
    }
}

impl FontWrite for CompositeGlyph {
    fn write_into(&self, writer: &mut TableWriter) {
        const N_CONTOURS: i16 = -1;
        N_CONTOURS.write_into(writer);
        self.bbox.write_into(writer);
        // empty composites are rejected in validation
        let Some((last, rest)) = self.components.split_last() else {
            return;
        };
        for comp in rest {
            comp.write_into(writer, CompositeGlyphFlags::MORE_COMPONENTS);
        }
        let last_flags = if self.instructions.is_empty() {
            CompositeGlyphFlags::empty()
        } else {
            CompositeGlyphFlags::WE_HAVE_INSTRUCTIONS
        };
        last.write_into(writer, last_flags);

        if !self.instructions.is_empty() {
            (self.instructions.len() as u16).write_into(writer);
            writer.write_slice(&self.instructions);
        }
        writer.pad_to_2byte_aligned();
    }
}

impl Validate for CompositeGlyph {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("CompositeGlyph", |ctx| {
            if self.components.is_empty() {
                ctx.report("composite glyph must have components");
            }
            if self.instructions.len() > u16::MAX as usize {
                ctx.report("instructions len overflows");
            }
        })
    }
}

impl FontWrite for Anchor {
    fn write_into(&self, writer: &mut TableWriter) {
        let two_bytes = self
            .compute_flags()
            .contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS);
        match self {
            Anchor::Offset { x, y } if !two_bytes => {
                (*x as i8).write_into(writer);
                (*y as i8).write_into(writer);
            }
            Anchor::Offset { x, y } => [*x, *y].write_into(writer),
            Anchor::Point { base, component } if !two_bytes => {
                (*base as u8).write_into(writer);
                (*component as u8).write_into(writer);
            }
            Anchor::Point { base, component } => [*base, *component].write_into(writer),
        }
    }
}

impl FontWrite for Transform {
    fn write_into(&self, writer: &mut TableWriter) {
        let flags = self.compute_flags();
        if flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
            [self.xx, self.yx, self.xy, self.yy].write_into(writer);
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            [self.xx, self.yy].write_into(writer);
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
            self.xx.write_into(writer)
        }
    }
}

impl From<CompositeGlyphFlags> for ComponentFlags {
    fn from(src: CompositeGlyphFlags) -> ComponentFlags {
        ComponentFlags {
            round_xy_to_grid: src.contains(CompositeGlyphFlags::ROUND_XY_TO_GRID),
            use_my_metrics: src.contains(CompositeGlyphFlags::USE_MY_METRICS),
            scaled_component_offset: src.contains(CompositeGlyphFlags::SCALED_COMPONENT_OFFSET),
            unscaled_component_offset: src.contains(CompositeGlyphFlags::UNSCALED_COMPONENT_OFFSET),
            overlap_compound: src.contains(CompositeGlyphFlags::OVERLAP_COMPOUND),
        }
    }
}

impl From<ComponentFlags> for CompositeGlyphFlags {
    fn from(value: ComponentFlags) -> Self {
        [
            (value.round_xy_to_grid, CompositeGlyphFlags::ROUND_XY_TO_GRID),
            (value.use_my_metrics, CompositeGlyphFlags::USE_MY_METRICS),
            (
                value.scaled_component_offset,
                CompositeGlyphFlags::SCALED_COMPONENT_OFFSET,
            ),
            (
                value.unscaled_component_offset,
                CompositeGlyphFlags::UNSCALED_COMPONENT_OFFSET,
            ),
            (value.overlap_compound, CompositeGlyphFlags::OVERLAP_COMPOUND),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .fold(CompositeGlyphFlags::empty(), |acc, (_, flag)| acc | flag)
    }
}
