//! Fonts survive serialization through serde.
#![cfg(feature = "serde")]

use pretty_assertions::assert_eq;
use sfnt_codec::{
    tables::{
        cmap::{Cmap, Cmap4, EncodingRecord},
        glyf::{CompositeGlyph, Glyf, Glyph, SimpleGlyph},
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        name::{Name, NameRecord},
    },
    Font, FontData, FontRead,
};

fn test_font() -> Font {
    let simple = SimpleGlyph::read(FontData::new(font_test_data::glyf::SIMPLE_GLYPH)).unwrap();
    let composite =
        CompositeGlyph::read(FontData::new(font_test_data::glyf::COMPOSITE_GLYPH)).unwrap();
    let mut font = Font::default();
    font.insert(Head::default());
    font.insert(Hhea::default());
    font.insert(Hmtx::new(
        vec![LongMetric {
            advance: 500,
            side_bearing: 0,
        }],
        vec![0, 0, 0],
    ));
    font.insert(Glyf::new(vec![
        Glyph::Empty(Default::default()),
        Glyph::Empty(Default::default()),
        Glyph::Simple(simple),
        Glyph::Composite(composite),
    ]));
    font.insert(Cmap::new(vec![EncodingRecord::new(
        3,
        1,
        Cmap4::from_glyphs(&[vec![], vec![], vec![0x41], vec![0xC5]]),
    )]));
    font.insert(Name::new(vec![NameRecord::new_windows(1, "Serde Sans")]));
    font
}

#[test]
fn bincode_roundtrip() {
    let mut font = test_font();
    let bytes = font.encode().unwrap();
    let decoded = Font::decode(&bytes).unwrap();

    let serialized = bincode::serialize(&decoded).unwrap();
    let deserialized: Font = bincode::deserialize(&serialized).unwrap();
    assert_eq!(deserialized, decoded);

    let mut deserialized = deserialized;
    assert_eq!(deserialized.encode().unwrap(), bytes);
}
