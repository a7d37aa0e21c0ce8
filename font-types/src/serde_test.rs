//! ensure serde is working as expected

use super::*;

#[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Eq)]
struct MyTypes {
    f1: Fixed,
    f2: F2Dot14,
    gid: GlyphId16,
    date: LongDateTime,
    tag: Tag,
    version: Version16Dot16,
}

fn my_instance() -> MyTypes {
    MyTypes {
        f1: Fixed::from_f64(521.5),
        f2: F2Dot14::from_f32(1.25),
        gid: GlyphId16::new(69),
        date: LongDateTime::new(1_234_569_101),
        tag: Tag::new(b"cool"),
        version: Version16Dot16::VERSION_2_5,
    }
}

#[test]
fn human_readable() {
    let dumped = serde_json::to_string(&my_instance()).unwrap();
    assert!(dumped.contains("\"cool\""));
    let loaded: MyTypes = serde_json::from_str(&dumped).unwrap();
    assert_eq!(my_instance(), loaded)
}

#[test]
fn binary() {
    let dumped = bincode::serialize(&my_instance()).unwrap();
    let loaded: MyTypes = bincode::deserialize(&dumped).unwrap();
    assert_eq!(my_instance(), loaded)
}
