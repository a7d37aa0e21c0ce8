//! Traits for interpreting font data

use font_types::Tag;

use crate::font_data::FontData;

/// A type that can be read from raw table data.
///
/// This trait is implemented for all tables that are self-describing: that
/// is, tables that do not require any external state in order to interpret their
/// underlying bytes. (Tables that require external state implement
/// [`FontReadWithArgs`] instead)
pub trait FontRead: Sized {
    /// Read an instance of `Self` from the provided data.
    ///
    /// Implementations are responsible for ensuring that counts and offsets
    /// stay within `data`, returning [`ReadError::OutOfBounds`] otherwise.
    fn read(data: FontData<'_>) -> Result<Self, ReadError>;
}

/// A trait for a type that needs additional arguments to be read.
pub trait ReadArgs {
    type Args: Copy;
}

/// A trait for types that require external data in order to be constructed.
///
/// If a type requires multiple arguments, they are passed as a tuple.
pub trait FontReadWithArgs: Sized + ReadArgs {
    /// read an item, using the provided args.
    fn read_with_args(data: FontData<'_>, args: &Self::Args) -> Result<Self, ReadError>;
}

// a blanket impl so that self-describing types can be used wherever args are
// expected.
impl<T: FontRead> ReadArgs for T {
    type Args = ();
}

impl<T: FontRead> FontReadWithArgs for T {
    fn read_with_args(data: FontData<'_>, _: &Self::Args) -> Result<Self, ReadError> {
        Self::read(data)
    }
}

/// An error that occurs when reading font data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    OutOfBounds,
    // i64 is flexible enough to store any value we might encounter
    InvalidFormat(i64),
    InvalidSfnt(u32),
    InvalidArrayLen,
    TableIsMissing(Tag),
    MalformedData(&'static str),
    /// The glyph count in `maxp` disagrees with the number of `loca` entries.
    GlyphCountMismatch { loca: usize, num_glyphs: u16 },
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "An offset was out of bounds"),
            ReadError::InvalidFormat(x) => write!(f, "Invalid format '{x}'"),
            ReadError::InvalidSfnt(ver) => write!(f, "Invalid sfnt version 0x{ver:08X}"),
            ReadError::InvalidArrayLen => {
                write!(f, "Specified array length not a multiple of item size")
            }
            ReadError::TableIsMissing(tag) => write!(f, "the {tag} table is missing"),
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
            ReadError::GlyphCountMismatch { loca, num_glyphs } => write!(
                f,
                "loca has {loca} glyph entries but maxp declares {num_glyphs} glyphs"
            ),
        }
    }
}

impl std::error::Error for ReadError {}
