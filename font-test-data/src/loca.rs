//! loca test data
//!
//! Both tables hold the offsets `[0, 152, 152, 152, 864]`.

#[rustfmt::skip]
pub static SHORT: &[u8] = &[
    0x00, 0x00, 0x00, 0x4C, 0x00, 0x4C, 0x00, 0x4C, 0x01, 0xB0,
];

#[rustfmt::skip]
pub static LONG: &[u8] = &[
    0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x98,
    0x00, 0x00, 0x00, 0x98,
    0x00, 0x00, 0x00, 0x98,
    0x00, 0x00, 0x03, 0x60,
];
