//! hhea test data

#[rustfmt::skip]
pub static SIMPLE: &[u8] = &[
    0x00, 0x01, 0x00, 0x00, // version 1.0
    0x05, 0x6B, // ascender 1387
    0x00, 0x00, // descender 0
    0x00, 0x57, // lineGap 87
    0x06, 0x39, // advanceWidthMax 1593
    0x00, 0x00, // minLeftSideBearing 0
    0x00, 0x00, // minRightSideBearing 0
    0x06, 0xCC, // xMaxExtent 1740
    0x00, 0x00, // caretSlopeRise 0
    0x00, 0x00, // caretSlopeRun 0
    0x00, 0x00, // caretOffset 0
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // reserved
    0x00, 0x00, // metricDataFormat 0
    0x00, 0x04, // numberOfHMetrics 4
];
