//! post test data

#[rustfmt::skip]
pub static SIMPLE: &[u8] = &[
    0x00, 0x02, 0x00, 0x00, // version 2.0
    0x00, 0x00, 0x00, 0x00, // italic angle
    0xFF, 0xB5,             // underlinePosition -75
    0x00, 0x32,             // underlineThickness 50
    0x00, 0x00, 0x00, 0x00, // fixedpitch
    0x00, 0x00, 0x00, 0x00, // min/max mem:
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x04,             // numGlyphs 4
                            // glyph name index:
    0x00, 0x00,             // glyph 0 -> name 0 ('.notdef')
    0x00, 0x03,             // glyph 1 -> name 3 ('space')
    0x00, 0x24,             // glyph 2 -> name 36 ('A')
    0x01, 0x02,             // glyph 3 -> name 258, first custom
    0x05, 0x68, 0x65, 0x6C, 0x6C, 0x6F, // 5, h e l l o
];
