//! Common [scalar data types][data types] used in sfnt font files
//!
//! [data types]: https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod fixed;
mod glyph_id;
mod longdatetime;
mod raw;
mod tag;
mod version;

#[cfg(all(test, feature = "serde"))]
mod serde_test;

pub use fixed::{F2Dot14, Fixed};
pub use glyph_id::GlyphId16;
pub use longdatetime::LongDateTime;
pub use raw::Scalar;
pub use tag::{InvalidTag, Tag};
pub use version::Version16Dot16;

/// The SFNT version for fonts containing TrueType outlines.
pub const TT_SFNT_VERSION: u32 = 0x00010000;
/// The SFNT version for fonts containing CFF outlines.
pub const CFF_SFNT_VERSION: u32 = 0x4F54544F;
/// The SFNT version used by legacy Apple TrueType fonts ('true').
pub const APPLE_TT_SFNT_VERSION: u32 = 0x74727565;
