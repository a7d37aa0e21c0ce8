//! test data shared between the sfnt-codec crates.
//!
//! Each module holds hand-assembled table data, annotated field by field.
//! Whole fonts live under `test_data/ttf`.

pub mod cmap;
pub mod glyf;
pub mod head;
pub mod hhea;
pub mod kern;
pub mod loca;
pub mod name;
pub mod post;

/// A five glyph TrueType font laid out the way the encoder writes fonts.
///
/// Glyphs are `.notdef`, `.null` (empty), `A`, `B` and a composite of `A`
/// with a half-scale `.notdef`, named `Aring.ss01` in a version 2 `post`.
/// Tables are in tag order, each padded to four bytes. Glyphs are padded to
/// two bytes, contour starts carry `OVERLAP_SIMPLE`, and `A` stores a pair of
/// identical flags as one repeated flag. The two `cmap` records share a
/// single format 4 subtable, `name` strings are stored out of record order,
/// and `gasp` is kept as an uninterpreted table.
pub static TINY_SANS: &[u8] = include_bytes!("../test_data/ttf/tiny_sans.ttf");
