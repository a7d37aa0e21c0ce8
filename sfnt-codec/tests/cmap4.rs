//! Properties of format 4 subtables built from glyph code points.

use std::collections::BTreeMap;

use font_types::GlyphId16;
use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};
use sfnt_codec::{dump_table, tables::cmap::Cmap4, FontData, FontRead};

const N_GLYPHS: usize = 300;

/// Code points for each glyph, with some runs, some gaps, some codes shared
/// between glyphs and a few outside the BMP.
fn random_glyphs(seed: u64) -> Vec<Vec<u32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut next_run = 0x20u32;
    (0..N_GLYPHS)
        .map(|_| match rng.gen_range(0..10) {
            0 => Vec::new(),
            1 => vec![rng.gen_range(0x1_0000..0x2_0000)],
            2 => vec![rng.gen_range(0x20..0x3000), rng.gen_range(0x20..0x3000)],
            3..=5 => vec![rng.gen_range(0x20..0xFFFF)],
            _ => {
                next_run += rng.gen_range(1..3);
                vec![next_run]
            }
        })
        .collect()
}

/// The mapping the subtable should hold: lowest glyph wins, glyphs 0 and 1
/// and non-BMP codes are skipped.
fn expected_mapping(glyphs: &[Vec<u32>]) -> BTreeMap<u16, GlyphId16> {
    let mut expected = BTreeMap::new();
    for (gid, codes) in glyphs.iter().enumerate().skip(2) {
        for code in codes {
            if let Ok(code) = u16::try_from(*code) {
                expected
                    .entry(code)
                    .or_insert(GlyphId16::new(gid as u16));
            }
        }
    }
    expected
}

#[test]
fn lookups_match_input() {
    for seed in 0..8 {
        let glyphs = random_glyphs(seed);
        let table = Cmap4::from_glyphs(&glyphs);
        let expected = expected_mapping(&glyphs);
        for (code, gid) in &expected {
            assert_eq!(table.gid(*code), *gid, "seed {seed}, code {code:#06X}");
        }
        let mapped = table
            .iter()
            .filter(|(_, gid)| *gid != GlyphId16::NOTDEF)
            .collect::<BTreeMap<_, _>>();
        assert_eq!(mapped, expected, "seed {seed}");
    }
}

#[test]
fn reverse_lookups_match_input() {
    let glyphs = random_glyphs(42);
    let table = Cmap4::from_glyphs(&glyphs);
    let expected = expected_mapping(&glyphs);
    for gid in (0..N_GLYPHS as u16).map(GlyphId16::new).skip(2) {
        let codes = expected
            .iter()
            .filter(|(_, mapped)| **mapped == gid)
            .map(|(code, _)| *code)
            .collect::<Vec<_>>();
        assert_eq!(table.codes(gid), codes);
    }
}

#[test]
fn segments_are_sorted_and_terminated() {
    for seed in 0..8 {
        let table = Cmap4::from_glyphs(&random_glyphs(seed));
        let last = table.segments.last().unwrap();
        assert_eq!(last.end_code(), Some(0xFFFF));
        assert_eq!(last.gid(0xFFFF), Some(GlyphId16::NOTDEF));
        for pair in table.segments.windows(2) {
            assert!(pair[0].end_code() < pair[1].start_code());
        }
        for segment in &table.segments {
            let (start, end) = (segment.start_code().unwrap(), segment.end_code().unwrap());
            assert_eq!(segment.len(), (end - start) as usize + 1);
        }
    }
}

#[test]
fn written_tables_read_back() {
    for seed in 0..8 {
        let table = Cmap4::from_glyphs(&random_glyphs(seed));
        let bytes = dump_table(&table).unwrap();
        let length = u16::from_be_bytes([bytes[2], bytes[3]]);
        assert_eq!(length as usize, bytes.len());
        let loaded = Cmap4::read(FontData::new(&bytes)).unwrap();
        assert_eq!(loaded, table, "seed {seed}");
    }
}

#[test]
fn empty_input_has_only_the_final_segment() {
    let table = Cmap4::from_glyphs::<Vec<u32>>(&[]);
    assert_eq!(table.segments.len(), 1);
    let bytes = dump_table(&table).unwrap();
    // header, one segment and the reserved pad
    assert_eq!(bytes.len(), 14 + 8 + 2);
}
