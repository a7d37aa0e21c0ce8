//! glyph test data

/// One contour of six points with two bytes of instructions.
///
/// Points: (100, 0) on, (100, 700) on, three off-curve points each moving
/// by (20, 10), then (500, 0) on.
#[rustfmt::skip]
pub static SIMPLE_GLYPH: &[u8] = &[
    0x00, 0x01, // numberOfContours 1
    0x00, 0x64, // xMin 100
    0x00, 0x00, // yMin 0
    0x01, 0xF4, // xMax 500
    0x02, 0xDA, // yMax 730
    0x00, 0x05, // endPtsOfContours [5]
    0x00, 0x02, // instructionLength 2
    0xB0, 0x01, // instructions
    0x73,       // on, overlap, x short positive, y same
    0x11,       // on, x same, y long
    0x3E, 0x02, // off, x and y short positive, repeated twice more
    0x01,       // on, x long, y long
    0x64,                   // x: +100
    0x14, 0x14, 0x14,       // x: +20, +20, +20
    0x01, 0x54,             // x: +340
    0x02, 0xBC,             // y: +700
    0x0A, 0x0A, 0x0A,       // y: +10, +10, +10
    0xFD, 0x26,             // y: -730
];

/// Two components: glyph 1 at the origin (supplying metrics) and glyph 2
/// at (300, -20) scaled by one half.
#[rustfmt::skip]
pub static COMPOSITE_GLYPH: &[u8] = &[
    0xFF, 0xFF, // numberOfContours -1
    0x00, 0x00, // xMin 0
    0xFF, 0xEC, // yMin -20
    0x02, 0x58, // xMax 600
    0x02, 0xDA, // yMax 730
    0x02, 0x22, // USE_MY_METRICS | MORE_COMPONENTS | ARGS_ARE_XY_VALUES
    0x00, 0x01, // glyphIndex 1
    0x00, 0x00, // args (0, 0) as bytes
    0x00, 0x0B, // WE_HAVE_A_SCALE | ARGS_ARE_XY_VALUES | ARG_1_AND_2_ARE_WORDS
    0x00, 0x02, // glyphIndex 2
    0x01, 0x2C, // arg1 300
    0xFF, 0xEC, // arg2 -20
    0x20, 0x00, // scale 0.5
];
