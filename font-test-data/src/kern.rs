//! kern test data

/// A version 0 table with one format 0 subtable holding three pairs.
#[rustfmt::skip]
pub static KERN_VER_0_FMT_0_DATA: &[u8] = &[
    0x00, 0x00, // version 0
    0x00, 0x01, // nTables 1
    0x00, 0x00, // subtable version 0
    0x00, 0x20, // length 32
    0x00,       // format 0
    0x01,       // coverage: horizontal
    0x00, 0x03, // nPairs 3
    0x00, 0x0C, // searchRange 12
    0x00, 0x01, // entrySelector 1
    0x00, 0x06, // rangeShift 6
    0x00, 0x04, 0x00, 0x0C, 0xFF, 0xD8, // left 4, right 12, value -40
    0x00, 0x04, 0x00, 0x1C, 0x00, 0x28, // left 4, right 28, value 40
    0x00, 0x05, 0x00, 0x28, 0xFF, 0xCE, // left 5, right 40, value -50
];
