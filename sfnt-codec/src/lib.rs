//! Reading and writing sfnt font files
//!
//! This crate decodes TrueType and OpenType fonts into owned, typed tables,
//! and encodes them back into bytes. Decoding a font and encoding it again
//! reproduces the original file, as long as that file was itself well formed.
//!
//! The root [`tables`] module contains a submodule for each supported
//! [table][table-directory]. Each table type can be read and written on its
//! own through the [`FontRead`]/[`FontReadWithArgs`] and [`FontWrite`] traits;
//! a whole font is handled by [`Font`].
//!
//! Tables depend on one another: `glyf` can only be read with `loca`, which
//! needs `head`, and the glyph count lives in `maxp`. [`Font::decode`] reads
//! tables in whatever order these dependencies require, and [`Font::encode`]
//! recomputes the dependent values from `glyf` and `hmtx` before writing.
//!
//! # Example
//!
//! ```no_run
//! # fn get_font_bytes() -> Vec<u8> { Vec::new() }
//! use sfnt_codec::{tables::maxp::Maxp, Font};
//!
//! let bytes = get_font_bytes();
//! let mut font = Font::decode(&bytes).expect("failed to read font");
//! for warning in &font.warnings {
//!     eprintln!("{warning}");
//! }
//! println!("{} glyphs", font.get::<Maxp>().map(|m| m.num_glyphs).unwrap_or(0));
//! let encoded = font.encode().expect("failed to write font");
//! assert_eq!(encoded, bytes);
//! ```
//!
//! # Features
//!
//! - `serde`: derive `Serialize` and `Deserialize` for every table type.
//!
//! [table-directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
mod font;
pub mod font_builder;
pub mod font_data;
mod graph;
pub mod read;
pub mod tables;
pub mod util;
pub mod validate;
pub mod write;

pub use error::Error;
pub use font::{DecodeError, Font};
pub use font_builder::{BuilderError, FontBuilder};
pub use font_data::FontData;
pub use graph::OffsetLen;
pub use read::{FontRead, FontReadWithArgs, ReadError};
pub use tables::{FromTable, Table, TopLevelTable};
pub use write::{dump_table, FontWrite, TableWriter};

/// Public re-export of the font-types crate.
pub extern crate font_types as types;
