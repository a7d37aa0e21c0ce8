//! cmap test data

/// A format 4 subtable with two segments, each stored as an explicit
/// glyph array.
///
/// Maps 1..=3 to glyphs 10, 20, 30 and 4..=6 to glyphs 40, 50, 60.
#[rustfmt::skip]
pub static FORMAT4_EXPLICIT: &[u8] = &[
    0x00, 0x04, // format 4
    0x00, 0x2C, // length 44
    0x00, 0x01, // language 1
    0x00, 0x04, // segCountX2 4
    0x00, 0x04, // searchRange 4
    0x00, 0x01, // entrySelector 1
    0x00, 0x00, // rangeShift 0
    0x00, 0x03, 0x00, 0x06, // endCode [3, 6]
    0x00, 0x00,             // reservedPad
    0x00, 0x01, 0x00, 0x04, // startCode [1, 4]
    0x00, 0x00, 0x00, 0x00, // idDelta [0, 0]
    0x00, 0x04, 0x00, 0x08, // idRangeOffset [4, 8]
    0x00, 0x0A, 0x00, 0x14, 0x00, 0x1E, // glyphIdArray, first segment
    0x00, 0x28, 0x00, 0x32, 0x00, 0x3C, // glyphIdArray, second segment
];

/// A cmap with one encoding record (3, 2) pointing at [`FORMAT4_EXPLICIT`].
#[rustfmt::skip]
pub static CMAP_FORMAT4_EXPLICIT: &[u8] = &[
    0x00, 0x00, // version 0
    0x00, 0x01, // numTables 1
    0x00, 0x03, // platformID 3
    0x00, 0x02, // encodingID 2
    0x00, 0x00, 0x00, 0x0C, // subtableOffset 12
    // the subtable
    0x00, 0x04, 0x00, 0x2C, 0x00, 0x01, 0x00, 0x04,
    0x00, 0x04, 0x00, 0x01, 0x00, 0x00,
    0x00, 0x03, 0x00, 0x06,
    0x00, 0x00,
    0x00, 0x01, 0x00, 0x04,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x04, 0x00, 0x08,
    0x00, 0x0A, 0x00, 0x14, 0x00, 0x1E,
    0x00, 0x28, 0x00, 0x32, 0x00, 0x3C,
];
