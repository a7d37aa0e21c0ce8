//! Whole-font decode and encode.

use font_types::{GlyphId16, Tag};
use pretty_assertions::assert_eq;
use rstest::rstest;
use sfnt_codec::{
    font_builder::TableDirectory,
    tables::{
        cmap::{Cmap, Cmap4, EncodingRecord},
        cvt::Cvt,
        fpgm::Fpgm,
        glyf::{CompositeGlyph, CurvePoint, EmptyGlyph, Glyf, Glyph, SimpleGlyph},
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        kern::{Kern, KernPair, KernSubtable},
        loca::Loca,
        maxp::Maxp,
        name::{Name, NameRecord},
        os2::Os2,
        post::Post,
        prep::Prep,
    },
    Font, FontData, FontRead, ReadError, TopLevelTable,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn metric(advance: u16, side_bearing: i16) -> LongMetric {
    LongMetric {
        advance,
        side_bearing,
    }
}

/// A small but complete TrueType font with five glyphs:
/// `.notdef` and `.null` (both empty), `A`, `B` and a composite `Aring`.
fn test_font() -> Font {
    let a = SimpleGlyph::read(FontData::new(font_test_data::glyf::SIMPLE_GLYPH)).unwrap();
    let b = SimpleGlyph::from_contours(
        &[vec![
            CurvePoint::on_curve(50, 0),
            CurvePoint::on_curve(50, 700),
            CurvePoint::off_curve(450, 700),
            CurvePoint::on_curve(450, 0),
        ]],
        Vec::new(),
    );
    let aring =
        CompositeGlyph::read(FontData::new(font_test_data::glyf::COMPOSITE_GLYPH)).unwrap();

    let mut font = Font::default();
    font.insert(Head {
        units_per_em: 1000,
        x_max: 600,
        y_max: 730,
        ..Default::default()
    });
    font.insert(Hhea {
        ascender: 800,
        descender: -200,
        advance_width_max: 600,
        ..Default::default()
    });
    font.insert(Hmtx::new(
        vec![
            metric(500, 0),
            metric(0, 0),
            metric(600, 100),
            metric(500, 50),
            metric(600, 0),
        ],
        vec![],
    ));
    font.insert(Glyf::new(vec![
        Glyph::Empty(EmptyGlyph::default()),
        Glyph::Empty(EmptyGlyph::default()),
        Glyph::Simple(a),
        Glyph::Simple(b),
        Glyph::Composite(aring),
    ]));
    let unicode = Cmap4::from_glyphs(&[vec![], vec![], vec![0x41], vec![0x42], vec![0xC5]]);
    font.insert(Cmap::new(vec![
        EncodingRecord::new(0, 3, unicode.clone()),
        EncodingRecord::new(3, 1, unicode),
    ]));
    font.insert(Name::new(vec![
        NameRecord::new_windows(1, "Test Sans"),
        NameRecord::new_windows(2, "Regular"),
    ]));
    font.insert(Os2::default());
    font.insert(Post::default().with_glyph_names([".notdef", ".null", "A", "B", "Aring"]));
    font.insert(Kern::new(vec![KernSubtable::horizontal(vec![
        KernPair::new(2, 3, -30),
        KernPair::new(3, 2, -20),
    ])]));
    font.insert(Cvt {
        values: vec![0, 700, -200],
    });
    font.insert(Fpgm {
        instructions: vec![0xB0, 0x00, 0x2C],
    });
    font.insert(Prep {
        instructions: vec![0xB8, 0x01, 0xFF],
    });
    font.insert_raw(Tag::new(b"TEST"), vec![1, 2, 3, 4, 5]);
    font
}

fn flip_last_byte(bytes: &mut [u8], tag: Tag) {
    let directory = TableDirectory::read(FontData::new(bytes)).unwrap();
    let record = *directory.find(tag).unwrap();
    let last = (record.offset + record.length - 1) as usize;
    bytes[last] ^= 0x01;
}

#[test]
fn encode_decode_encode_is_identity() {
    init_logging();
    let mut font = test_font();
    let first = font.encode().unwrap();

    let mut decoded = Font::decode(&first).unwrap();
    assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
    assert_eq!(decoded, font);

    let second = decoded.encode().unwrap();
    assert_eq!(first, second);
}

#[test]
fn checked_in_font_is_reproduced_exactly() {
    init_logging();
    let mut decoded = Font::decode(font_test_data::TINY_SANS).unwrap();
    assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
    assert_eq!(decoded.num_glyphs(), Ok(5));
    assert!(decoded.contains(Tag::new(b"gasp")));
    assert_eq!(
        decoded.get::<Cmap>().unwrap().map_codepoint(0xC5),
        Some(GlyphId16::new(4))
    );
    assert_eq!(
        decoded.get::<Post>().unwrap().glyph_name(GlyphId16::new(4)),
        Some("Aring.ss01")
    );
    assert_eq!(
        decoded.get::<Name>().unwrap().get(4).as_deref(),
        Some("Tiny Sans Regular")
    );

    let bytes = decoded.encode().unwrap();
    assert_eq!(bytes, font_test_data::TINY_SANS);
}

#[test]
fn derived_tables_are_present() {
    let mut font = test_font();
    let bytes = font.encode().unwrap();
    let decoded = Font::decode(&bytes).unwrap();

    assert_eq!(decoded.num_glyphs(), Ok(5));
    assert!(decoded.contains(Loca::TAG));
    assert_eq!(decoded.get::<Maxp>().unwrap().num_glyphs, 5);
    assert_eq!(decoded.get::<Hhea>().unwrap().number_of_h_metrics, 5);
    let loca = decoded.get::<Loca>().unwrap();
    assert_eq!(loca.offsets.len(), 6);
    assert_eq!(loca.offsets[0], loca.offsets[2]);
}

#[test]
fn decoded_font_answers_queries() {
    let mut font = test_font();
    let bytes = font.encode().unwrap();
    let decoded = Font::decode(&bytes).unwrap();

    let cmap = decoded.get::<Cmap>().unwrap();
    assert_eq!(cmap.map_codepoint(0x41), Some(GlyphId16::new(2)));
    assert_eq!(cmap.map_codepoint(0xC5), Some(GlyphId16::new(4)));
    assert_eq!(cmap.map_codepoint(0x43), None);

    let name = decoded.get::<Name>().unwrap();
    assert_eq!(name.get(1).as_deref(), Some("Test Sans"));

    let post = decoded.get::<Post>().unwrap();
    assert_eq!(post.glyph_name(GlyphId16::new(4)), Some("Aring"));

    let kern = decoded.get::<Kern>().unwrap();
    assert_eq!(kern.kerning(GlyphId16::new(2), GlyphId16::new(3)), Some(-30));

    let hmtx = decoded.get::<Hmtx>().unwrap();
    assert_eq!(hmtx.advance(4), Some(600));
}

#[test]
fn tables_are_sorted_and_aligned() {
    let mut font = test_font();
    let bytes = font.encode().unwrap();
    assert_eq!(bytes.len() % 4, 0);

    let directory = TableDirectory::read(FontData::new(&bytes)).unwrap();
    let tags = directory
        .table_records
        .iter()
        .map(|record| record.tag)
        .collect::<Vec<_>>();
    let mut sorted = tags.clone();
    sorted.sort();
    assert_eq!(tags, sorted);
    assert!(directory
        .table_records
        .iter()
        .all(|record| record.offset % 4 == 0));
}

#[test]
fn clean_font_has_no_warnings() {
    let mut font = test_font();
    let bytes = font.encode().unwrap();
    assert!(Font::decode(&bytes).unwrap().warnings.is_empty());
}

#[rstest]
#[case::glyf(b"glyf")]
#[case::hmtx(b"hmtx")]
#[case::kern(b"kern")]
#[case::name(b"name")]
#[case::post(b"post")]
fn one_warning_per_corrupted_table(#[case] tag: &[u8; 4]) {
    init_logging();
    let mut font = test_font();
    let mut bytes = font.encode().unwrap();
    let tag = Tag::new(tag);
    flip_last_byte(&mut bytes, tag);

    let decoded = Font::decode(&bytes).unwrap();
    assert_eq!(decoded.warnings.len(), 1, "{:?}", decoded.warnings);
    assert!(decoded.warnings[0].contains(&tag.to_string()));
}

#[test]
fn two_corrupted_tables_two_warnings() {
    let mut font = test_font();
    let mut bytes = font.encode().unwrap();
    flip_last_byte(&mut bytes, Name::TAG);
    flip_last_byte(&mut bytes, Post::TAG);
    assert_eq!(Font::decode(&bytes).unwrap().warnings.len(), 2);
}

#[test]
fn corrupted_directory_checksum() {
    let mut font = test_font();
    let mut bytes = font.encode().unwrap();
    let directory = TableDirectory::read(FontData::new(&bytes)).unwrap();
    let idx = directory
        .table_records
        .iter()
        .position(|record| record.tag == Head::TAG)
        .unwrap();
    // the checksum follows the tag in each 16-byte record
    let pos = 12 + 16 * idx + 4;
    bytes[pos] ^= 0xFF;
    assert_eq!(Font::decode(&bytes).unwrap().warnings.len(), 1);
}

#[test]
fn glyph_count_mismatch() {
    let mut font = test_font();
    let mut bytes = font.encode().unwrap();
    let directory = TableDirectory::read(FontData::new(&bytes)).unwrap();
    let maxp = *directory.find(Maxp::TAG).unwrap();
    let pos = maxp.offset as usize + 4;
    bytes[pos..pos + 2].copy_from_slice(&6u16.to_be_bytes());

    let err = Font::decode(&bytes).unwrap_err();
    assert_eq!(
        err.inner,
        ReadError::GlyphCountMismatch {
            loca: 5,
            num_glyphs: 6
        }
    );
    assert_eq!(err.warnings.len(), 1);
}

#[test]
fn truncated_font_is_an_error() {
    let mut font = test_font();
    let bytes = font.encode().unwrap();
    let err = Font::decode(&bytes[..bytes.len() / 2]).unwrap_err();
    assert_eq!(err.inner, ReadError::OutOfBounds);
}
