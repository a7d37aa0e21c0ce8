//! The [hmtx (Horizontal Metrics)](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table

use font_types::Tag;

use crate::{
    font_data::FontData,
    read::{FontReadWithArgs, ReadArgs, ReadError},
    tables::TopLevelTable,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

/// The [hmtx](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) table.
///
/// Glyphs past the end of `h_metrics` share the advance of the last full
/// record, and store only a left side bearing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hmtx {
    pub h_metrics: Vec<LongMetric>,
    pub left_side_bearings: Vec<i16>,
}

/// An advance width and left side bearing pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LongMetric {
    pub advance: u16,
    pub side_bearing: i16,
}

impl Hmtx {
    pub fn new(h_metrics: Vec<LongMetric>, left_side_bearings: Vec<i16>) -> Self {
        Hmtx {
            h_metrics,
            left_side_bearings,
        }
    }

    /// The number of glyphs described by this table.
    pub fn num_glyphs(&self) -> usize {
        self.h_metrics.len() + self.left_side_bearings.len()
    }

    /// The advance width of a glyph, if it is in range.
    pub fn advance(&self, gid: u16) -> Option<u16> {
        let gid = gid as usize;
        if gid >= self.num_glyphs() {
            return None;
        }
        self.h_metrics
            .get(gid)
            .or_else(|| self.h_metrics.last())
            .map(|metric| metric.advance)
    }

    /// The left side bearing of a glyph, if it is in range.
    pub fn side_bearing(&self, gid: u16) -> Option<i16> {
        let gid = gid as usize;
        match self.h_metrics.get(gid) {
            Some(metric) => Some(metric.side_bearing),
            None => self
                .left_side_bearings
                .get(gid - self.h_metrics.len())
                .copied(),
        }
    }
}

impl TopLevelTable for Hmtx {
    const TAG: Tag = Tag::new(b"hmtx");
}

impl ReadArgs for Hmtx {
    /// `(number_of_h_metrics, num_glyphs)`
    type Args = (u16, u16);
}

impl FontReadWithArgs for Hmtx {
    fn read_with_args(data: FontData<'_>, args: &(u16, u16)) -> Result<Self, ReadError> {
        let (number_of_h_metrics, num_glyphs) = *args;
        let mut cursor = data.cursor();
        let mut h_metrics = Vec::with_capacity(number_of_h_metrics as usize);
        for _ in 0..number_of_h_metrics {
            h_metrics.push(LongMetric {
                advance: cursor.read()?,
                side_bearing: cursor.read()?,
            });
        }
        let n_bearings = num_glyphs.saturating_sub(number_of_h_metrics);
        let left_side_bearings = cursor.read_array(n_bearings as usize)?;
        Ok(Hmtx {
            h_metrics,
            left_side_bearings,
        })
    }
}

impl FontWrite for Hmtx {
    fn write_into(&self, writer: &mut TableWriter) {
        for metric in &self.h_metrics {
            metric.advance.write_into(writer);
            metric.side_bearing.write_into(writer);
        }
        self.left_side_bearings.write_into(writer);
    }
}

impl Validate for Hmtx {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("hmtx", |ctx| {
            ctx.in_field("h_metrics", |ctx| {
                if self.h_metrics.len() > u16::MAX as usize {
                    ctx.report("too many h_metrics");
                }
                if self.h_metrics.is_empty() && !self.left_side_bearings.is_empty() {
                    ctx.report("left side bearings require at least one full metric");
                }
            })
        })
    }
}
