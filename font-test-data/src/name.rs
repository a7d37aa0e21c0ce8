//! name test data

#[rustfmt::skip]
pub static SIMPLE: &[u8] = &[
    0x00, 0x00, // version 0
    0x00, 0x03, // count 3
    0x00, 0x2A, // storageOffset 42
    // mac roman family name
    0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x04, 0x00, 0x00,
    // windows family name
    0x00, 0x03, 0x00, 0x01, 0x04, 0x09, 0x00, 0x01, 0x00, 0x08, 0x00, 0x04,
    // windows subfamily name
    0x00, 0x03, 0x00, 0x01, 0x04, 0x09, 0x00, 0x02, 0x00, 0x0E, 0x00, 0x0C,
    // storage
    b'T', b'e', b's', b't',
    0x00, b'T', 0x00, b'e', 0x00, b's', 0x00, b't',
    0x00, b'R', 0x00, b'e', 0x00, b'g', 0x00, b'u', 0x00, b'l', 0x00, b'a', 0x00, b'r',
];
