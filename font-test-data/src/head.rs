//! head test data

#[rustfmt::skip]
pub static SIMPLE: &[u8] = &[
    0x00, 0x01, 0x00, 0x00, // version 1.0
    0x00, 0x01, 0x00, 0x00, // fontRevision 1.0
    0x00, 0x00, 0x00, 0x00, // checksumAdjustment
    0x5F, 0x0F, 0x3C, 0xF5, // magicNumber
    0x00, 0x03,             // flags
    0x08, 0x00,             // unitsPerEm 2048
    0x00, 0x00, 0x00, 0x00, 0xDC, 0x8B, 0x4A, 0x14, // created
    0x00, 0x00, 0x00, 0x00, 0xDC, 0x8B, 0x4A, 0x14, // modified
    0x00, 0x00, // xMin 0
    0x00, 0x00, // yMin 0
    0x05, 0xB0, // xMax 1456
    0x05, 0x6B, // yMax 1387
    0x00, 0x00, // macStyle
    0x00, 0x09, // lowestRecPPEM 9
    0x00, 0x02, // fontDirectionHint 2
    0x00, 0x00, // indexToLocFormat short
    0x00, 0x00, // glyphDataFormat
];
