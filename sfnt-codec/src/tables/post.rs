//! The [post (PostScript)](https://docs.microsoft.com/en-us/typography/opentype/spec/post) table

use std::collections::HashMap;

use font_types::{Fixed, GlyphId16, Tag, Version16Dot16};

use crate::{
    font_data::FontData,
    read::{FontRead, ReadError},
    tables::{name::MacRomanMapping, TopLevelTable},
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

const HEADER_LEN: usize = 32;

/// The [post] table.
///
/// Which of the optional fields are present depends on `version`: 2.0 has a
/// name index and string data, 2.5 has per-glyph offsets into the standard
/// names, 1.0 and 3.0 have neither. The data following the header of any
/// other version is kept in `other_data`.
///
/// [post]: https://docs.microsoft.com/en-us/typography/opentype/spec/post
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Post {
    pub version: Version16Dot16,
    pub italic_angle: Fixed,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: u32,
    pub min_mem_type42: u32,
    pub max_mem_type42: u32,
    pub min_mem_type1: u32,
    pub max_mem_type1: u32,
    pub glyph_name_index: Option<Vec<u16>>,
    pub string_data: Option<Vec<PString>>,
    pub offsets: Option<Vec<i8>>,
    pub other_data: Option<Vec<u8>>,
}

/// A Pascal string in the post table, stored as Mac Roman.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PString(String);

impl TopLevelTable for Post {
    const TAG: Tag = Tag::new(b"post");
}

impl Default for Post {
    fn default() -> Self {
        Post {
            version: Version16Dot16::VERSION_3_0,
            italic_angle: Fixed::ZERO,
            underline_position: 0,
            underline_thickness: 0,
            is_fixed_pitch: 0,
            min_mem_type42: 0,
            max_mem_type42: 0,
            min_mem_type1: 0,
            max_mem_type1: 0,
            glyph_name_index: None,
            string_data: None,
            offsets: None,
            other_data: None,
        }
    }
}

impl Post {
    /// Builder-style method to add glyph names to the table.
    ///
    /// See [`set_glyph_names`] for more information.
    ///
    /// [`set_glyph_names`]: Self::set_glyph_names
    pub fn with_glyph_names<'a>(mut self, order: impl IntoIterator<Item = &'a str>) -> Self {
        self.set_glyph_names(order);
        self
    }

    /// Set the glyph names for this table, in glyph order.
    ///
    /// Standard Macintosh names are referenced by index; other names are
    /// stored once each. The table version becomes 2.0.
    pub fn set_glyph_names<'a>(&mut self, order: impl IntoIterator<Item = &'a str>) {
        let mut known: HashMap<&str, u16> = DEFAULT_GLYPH_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| (*name, i as u16))
            .collect();
        let mut name_index = Vec::new();
        let mut storage = Vec::new();
        for name in order {
            let next = (DEFAULT_GLYPH_NAMES.len() + storage.len()) as u16;
            let idx = *known.entry(name).or_insert_with(|| {
                storage.push(PString(name.into()));
                next
            });
            name_index.push(idx);
        }
        self.version = Version16Dot16::VERSION_2_0;
        self.glyph_name_index = Some(name_index);
        self.string_data = Some(storage);
        self.offsets = None;
        self.other_data = None;
    }

    /// The number of glyphs named by this table, for versions that name them.
    pub fn num_glyphs(&self) -> Option<usize> {
        match self.version {
            Version16Dot16::VERSION_2_0 => self.glyph_name_index.as_ref().map(Vec::len),
            Version16Dot16::VERSION_2_5 => self.offsets.as_ref().map(Vec::len),
            _ => None,
        }
    }

    /// The name of a glyph, if this table names it.
    pub fn glyph_name(&self, gid: GlyphId16) -> Option<&str> {
        let gid = gid.to_u16() as usize;
        match self.version {
            Version16Dot16::VERSION_1_0 => DEFAULT_GLYPH_NAMES.get(gid).copied(),
            Version16Dot16::VERSION_2_0 => {
                let idx = *self.glyph_name_index.as_ref()?.get(gid)? as usize;
                match idx.checked_sub(DEFAULT_GLYPH_NAMES.len()) {
                    None => DEFAULT_GLYPH_NAMES.get(idx).copied(),
                    Some(idx) => self.string_data.as_ref()?.get(idx).map(PString::as_str),
                }
            }
            Version16Dot16::VERSION_2_5 => {
                let offset = *self.offsets.as_ref()?.get(gid)? as isize;
                let idx = usize::try_from(gid as isize + offset).ok()?;
                DEFAULT_GLYPH_NAMES.get(idx).copied()
            }
            _ => None,
        }
    }
}

impl PString {
    pub fn new(string: impl Into<String>) -> Self {
        PString(string.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn encode(&self) -> Option<Vec<u8>> {
        self.0.chars().map(|c| MacRomanMapping.encode(c)).collect()
    }
}

impl std::ops::Deref for PString {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq<&str> for PString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl FontRead for Post {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let mut table = Post {
            version: cursor.read()?,
            italic_angle: cursor.read()?,
            underline_position: cursor.read()?,
            underline_thickness: cursor.read()?,
            is_fixed_pitch: cursor.read()?,
            min_mem_type42: cursor.read()?,
            max_mem_type42: cursor.read()?,
            min_mem_type1: cursor.read()?,
            max_mem_type1: cursor.read()?,
            ..Default::default()
        };
        match table.version {
            Version16Dot16::VERSION_1_0 | Version16Dot16::VERSION_3_0 => (),
            Version16Dot16::VERSION_2_0 => {
                let num_glyphs: u16 = cursor.read()?;
                table.glyph_name_index = Some(cursor.read_array(num_glyphs as usize)?);
                let mut strings = Vec::new();
                while cursor.remaining_len() > 0 {
                    let len: u8 = cursor.read()?;
                    let bytes = cursor.read_bytes(len as usize)?;
                    strings.push(PString(
                        bytes.iter().map(|b| MacRomanMapping.decode(*b)).collect(),
                    ));
                }
                table.string_data = Some(strings);
            }
            Version16Dot16::VERSION_2_5 => {
                let num_glyphs: u16 = cursor.read()?;
                table.offsets = Some(cursor.read_array(num_glyphs as usize)?);
            }
            other => {
                log::debug!("keeping post version {other} data as raw bytes");
                table.other_data = Some(cursor.remaining_bytes().to_vec());
            }
        }
        Ok(table)
    }
}

impl FontWrite for Post {
    fn write_into(&self, writer: &mut TableWriter) {
        self.version.write_into(writer);
        self.italic_angle.write_into(writer);
        self.underline_position.write_into(writer);
        self.underline_thickness.write_into(writer);
        [
            self.is_fixed_pitch,
            self.min_mem_type42,
            self.max_mem_type42,
            self.min_mem_type1,
            self.max_mem_type1,
        ]
        .write_into(writer);
        if let Some(index) = &self.glyph_name_index {
            (index.len() as u16).write_into(writer);
            index.write_into(writer);
        }
        for string in self.string_data.iter().flatten() {
            let bytes = string.encode().unwrap_or_default();
            (bytes.len() as u8).write_into(writer);
            writer.write_slice(&bytes);
        }
        if let Some(offsets) = &self.offsets {
            (offsets.len() as u16).write_into(writer);
            offsets.write_into(writer);
        }
        if let Some(data) = &self.other_data {
            writer.write_slice(data);
        }
        debug_assert!(writer.current_len() >= HEADER_LEN);
    }
}

impl Validate for Post {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("post", |ctx| {
            let is_v2 = self.version == Version16Dot16::VERSION_2_0;
            let is_v2_5 = self.version == Version16Dot16::VERSION_2_5;
            let is_known = is_v2
                || is_v2_5
                || self.version == Version16Dot16::VERSION_1_0
                || self.version == Version16Dot16::VERSION_3_0;
            if self.glyph_name_index.is_some() != is_v2 || self.string_data.is_some() != is_v2 {
                ctx.report("glyph names must be present if and only if version is 2.0");
            }
            if self.offsets.is_some() != is_v2_5 {
                ctx.report("offsets must be present if and only if version is 2.5");
            }
            if self.other_data.is_some() == is_known {
                ctx.report(format!("unexpected data for version {}", self.version));
            }
            if let Some(index) = &self.glyph_name_index {
                if index.len() > u16::MAX as usize {
                    ctx.report("too many glyph names");
                }
                let n_names = DEFAULT_GLYPH_NAMES.len()
                    + self.string_data.as_ref().map(Vec::len).unwrap_or_default();
                if index.iter().any(|idx| *idx as usize >= n_names) {
                    ctx.report("glyph name index refers to a missing string");
                }
            }
            ctx.in_field("string_data", |ctx| {
                for string in self.string_data.iter().flatten() {
                    match string.encode() {
                        None => ctx.report(format!(
                            "'{}' is not representable in Mac Roman",
                            string.as_str()
                        )),
                        Some(bytes) if bytes.len() > u8::MAX as usize => {
                            ctx.report(format!("'{}' is too long", string.as_str()))
                        }
                        _ => (),
                    }
                }
            });
        })
    }
}

/// The 258 standard Macintosh glyph names, referenced by index from
/// version 1.0, 2.0 and 2.5 tables.
#[rustfmt::skip]
pub static DEFAULT_GLYPH_NAMES: [&str; 258] = [
    ".notdef", ".null", "nonmarkingreturn", "space", "exclam", "quotedbl", "numbersign", "dollar",
    "percent", "ampersand", "quotesingle", "parenleft", "parenright", "asterisk", "plus", "comma",
    "hyphen", "period", "slash", "zero", "one", "two", "three", "four", "five", "six", "seven",
    "eight", "nine", "colon", "semicolon", "less", "equal", "greater", "question", "at", "A", "B",
    "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U",
    "V", "W", "X", "Y", "Z", "bracketleft", "backslash", "bracketright", "asciicircum",
    "underscore", "grave", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n",
    "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "braceleft", "bar", "braceright",
    "asciitilde", "Adieresis", "Aring", "Ccedilla", "Eacute", "Ntilde", "Odieresis", "Udieresis",
    "aacute", "agrave", "acircumflex", "adieresis", "atilde", "aring", "ccedilla", "eacute",
    "egrave", "ecircumflex", "edieresis", "iacute", "igrave", "icircumflex", "idieresis", "ntilde",
    "oacute", "ograve", "ocircumflex", "odieresis", "otilde", "uacute", "ugrave", "ucircumflex",
    "udieresis", "dagger", "degree", "cent", "sterling", "section", "bullet", "paragraph",
    "germandbls", "registered", "copyright", "trademark", "acute", "dieresis", "notequal", "AE",
    "Oslash", "infinity", "plusminus", "lessequal", "greaterequal", "yen", "mu", "partialdiff",
    "summation", "product", "pi", "integral", "ordfeminine", "ordmasculine", "Omega", "ae",
    "oslash", "questiondown", "exclamdown", "logicalnot", "radical", "florin", "approxequal",
    "Delta", "guillemotleft", "guillemotright", "ellipsis", "nonbreakingspace", "Agrave", "Atilde",
    "Otilde", "OE", "oe", "endash", "emdash", "quotedblleft", "quotedblright", "quoteleft",
    "quoteright", "divide", "lozenge", "ydieresis", "Ydieresis", "fraction", "currency",
    "guilsinglleft", "guilsinglright", "fi", "fl", "daggerdbl", "periodcentered", "quotesinglbase",
    "quotedblbase", "perthousand", "Acircumflex", "Ecircumflex", "Aacute", "Edieresis", "Egrave",
    "Iacute", "Icircumflex", "Idieresis", "Igrave", "Oacute", "Ocircumflex", "apple", "Ograve",
    "Uacute", "Ucircumflex", "Ugrave", "dotlessi", "circumflex", "tilde", "macron", "breve",
    "dotaccent", "ring", "cedilla", "hungarumlaut", "ogonek", "caron", "Lslash", "lslash",
    "Scaron", "scaron", "Zcaron", "zcaron", "brokenbar", "Eth", "eth", "Yacute", "yacute", "Thorn",
    "thorn", "minus", "multiply", "onesuperior", "twosuperior", "threesuperior", "onehalf",
    "onequarter", "threequarters", "franc", "Gbreve", "gbreve", "Idotaccent", "Scedilla",
    "scedilla", "Cacute", "cacute", "Ccaron", "ccaron", "dcroat",
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn roundtrip_fixture() {
        use font_test_data::post as test_data;

        let table = Post::read(FontData::new(test_data::SIMPLE)).unwrap();
        assert_eq!(table.version, Version16Dot16::VERSION_2_0);
        assert_eq!(table.glyph_name(GlyphId16::new(0)), Some(".notdef"));
        assert_eq!(table.glyph_name(GlyphId16::new(2)), Some("A"));
        assert_eq!(table.glyph_name(GlyphId16::new(3)), Some("hello"));
        let dumped = crate::write::dump_table(&table).unwrap();
        assert_eq!(test_data::SIMPLE, &dumped);
    }

    #[test]
    fn compile_v2() {
        let post = Post::default().with_glyph_names([".notdef", "A", "B", "one", "flarb", "C", "flarb"]);
        let dumped = crate::write::dump_table(&post).unwrap();
        let loaded = Post::read(FontData::new(&dumped)).unwrap();
        assert_eq!(loaded.version, Version16Dot16::VERSION_2_0);
        assert_eq!(loaded.num_glyphs(), Some(7));
        assert_eq!(loaded.glyph_name(GlyphId16::new(1)), Some("A"));
        assert_eq!(loaded.glyph_name(GlyphId16::new(4)), Some("flarb"));
        assert_eq!(loaded.glyph_name(GlyphId16::new(5)), Some("C"));
        assert_eq!(loaded.glyph_name(GlyphId16::new(6)), Some("flarb"));
        assert_eq!(loaded.string_data.as_ref().unwrap().len(), 1);
        assert_eq!(loaded, post);
    }

    #[test]
    fn version_2_5() {
        let post = Post {
            version: Version16Dot16::VERSION_2_5,
            offsets: Some(vec![0, 0, 1, -1]),
            ..Default::default()
        };
        let dumped = crate::write::dump_table(&post).unwrap();
        assert_eq!(dumped.len(), HEADER_LEN + 2 + 4);
        let loaded = Post::read(FontData::new(&dumped)).unwrap();
        assert_eq!(loaded, post);
        assert_eq!(loaded.glyph_name(GlyphId16::new(2)), Some("space"));
        assert_eq!(loaded.glyph_name(GlyphId16::new(3)), Some("nonmarkingreturn"));
    }

    #[test]
    fn versions_without_names() {
        for version in [Version16Dot16::VERSION_1_0, Version16Dot16::VERSION_3_0] {
            let post = Post {
                version,
                italic_angle: Fixed::from_f64(-12.5),
                underline_position: -75,
                underline_thickness: 50,
                ..Default::default()
            };
            let dumped = crate::write::dump_table(&post).unwrap();
            assert_eq!(dumped.len(), HEADER_LEN);
            assert_eq!(Post::read(FontData::new(&dumped)).unwrap(), post);
        }
        let v1 = Post {
            version: Version16Dot16::VERSION_1_0,
            ..Default::default()
        };
        assert_eq!(v1.glyph_name(GlyphId16::new(36)), Some("A"));
        assert_eq!(Post::default().glyph_name(GlyphId16::new(36)), None);
    }

    #[test]
    fn mac_roman_names() {
        let post = Post::default().with_glyph_names([".notdef", "café"]);
        let dumped = crate::write::dump_table(&post).unwrap();
        // the stored string is 4 bytes long in Mac Roman
        assert_eq!(&dumped[HEADER_LEN + 6..], &[4, b'c', b'a', b'f', 0x8E]);
        let loaded = Post::read(FontData::new(&dumped)).unwrap();
        assert_eq!(loaded.glyph_name(GlyphId16::new(1)), Some("café"));
    }

    #[test]
    fn unrepresentable_name() {
        let post = Post::default().with_glyph_names(["ऄ"]);
        assert!(crate::write::dump_table(&post).is_err());
    }

    #[test]
    fn unknown_version_is_kept() {
        let post = Post {
            version: Version16Dot16::new(4, 0),
            other_data: Some(vec![0, 1, 0, 2]),
            ..Default::default()
        };
        let dumped = crate::write::dump_table(&post).unwrap();
        assert_eq!(Post::read(FontData::new(&dumped)).unwrap(), post);
    }
}
