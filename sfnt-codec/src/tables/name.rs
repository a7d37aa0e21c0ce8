//! The [name (Naming)](https://docs.microsoft.com/en-us/typography/opentype/spec/name) table

use std::{borrow::Cow, collections::HashMap};

use font_types::Tag;

use crate::{
    font_data::FontData,
    read::{FontRead, ReadError},
    tables::TopLevelTable,
    validate::{Validate, ValidationCtx},
    write::{FontWrite, TableWriter},
};

/// The [name] table.
///
/// Strings are kept as the raw bytes found in the font, so records in
/// encodings we can't decode survive a round trip.
///
/// A decoded table remembers its string storage, and writes it back
/// unchanged as long as every string is still found at its original
/// offset. Otherwise the storage is rebuilt, with identical strings
/// sharing bytes. Two tables with the same records are equal regardless of
/// how their storage is laid out.
///
/// [name]: https://docs.microsoft.com/en-us/typography/opentype/spec/name
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Name {
    pub name_records: Vec<NameRecord>,
    /// Language tags, present only in version 1 tables.
    pub lang_tag_records: Option<Vec<LangTagRecord>>,
    storage: Option<StringStorage>,
}

/// String storage as it was laid out in a decoded table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct StringStorage {
    data: Vec<u8>,
    /// One per name record, then one per language tag.
    offsets: Vec<u16>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    /// The encoded string.
    pub string: Vec<u8>,
}

/// A language tag referenced by name records with a language id of 0x8000
/// or greater; always UTF-16BE.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LangTagRecord {
    pub lang_tag: Vec<u8>,
}

/// The encoding used by the name table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Encoding {
    Utf16Be,
    MacRoman,
    Unknown,
}

impl TopLevelTable for Name {
    const TAG: Tag = Tag::new(b"name");
}

impl Name {
    pub fn new(name_records: Vec<NameRecord>) -> Self {
        Name {
            name_records,
            lang_tag_records: None,
            storage: None,
        }
    }

    /// The table version implied by the fields present.
    pub fn compute_version(&self) -> u16 {
        self.lang_tag_records.is_some().into()
    }

    /// The decoded string for `name_id`, preferring Windows English records.
    pub fn get(&self, name_id: u16) -> Option<String> {
        let mut candidates: Vec<_> = self
            .name_records
            .iter()
            .filter(|rec| rec.name_id == name_id)
            .collect();
        candidates.sort_by_key(|rec| {
            (
                (rec.platform_id, rec.language_id) != (3, 0x409),
                rec.platform_id != 3,
            )
        });
        candidates.into_iter().find_map(NameRecord::to_string_lossy)
    }

    fn compute_storage_offset(&self) -> usize {
        let v0 = 6 + self.name_records.len() * 12;
        match &self.lang_tag_records {
            Some(records) => v0 + 2 + 4 * records.len(),
            None => v0,
        }
    }

    /// Name record strings, then language tags.
    fn strings(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.name_records
            .iter()
            .map(|rec| rec.string.as_slice())
            .chain(
                self.lang_tag_records
                    .iter()
                    .flatten()
                    .map(|rec| rec.lang_tag.as_slice()),
            )
    }

    /// The decoded storage, if every string is still where it was found.
    fn kept_storage(&self) -> Option<&StringStorage> {
        let kept = self.storage.as_ref()?;
        let n_strings = self.name_records.len()
            + self.lang_tag_records.as_ref().map_or(0, Vec::len);
        let unchanged = kept.offsets.len() == n_strings
            && self.strings().zip(&kept.offsets).all(|(string, offset)| {
                let start = *offset as usize;
                kept.data.get(start..start + string.len()) == Some(string)
            });
        unchanged.then_some(kept)
    }

    /// The string storage, and the offset of each string within it: name
    /// records first, then language tags.
    fn compile_storage(&self) -> (Cow<'_, [u8]>, Vec<usize>) {
        if let Some(kept) = self.kept_storage() {
            let offsets = kept.offsets.iter().map(|offset| *offset as usize).collect();
            return (Cow::Borrowed(kept.data.as_slice()), offsets);
        }
        let mut storage = Vec::new();
        let mut seen: HashMap<&[u8], usize> = HashMap::new();
        let offsets = self
            .strings()
            .map(|string| {
                *seen.entry(string).or_insert_with(|| {
                    let offset = storage.len();
                    storage.extend_from_slice(string);
                    offset
                })
            })
            .collect();
        (Cow::Owned(storage), offsets)
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.name_records == other.name_records && self.lang_tag_records == other.lang_tag_records
    }
}

impl Eq for Name {}

impl Encoding {
    /// Determine the coding from the platform and encoding id.
    pub fn new(platform_id: u16, encoding_id: u16) -> Encoding {
        match (platform_id, encoding_id) {
            (0, _) => Encoding::Utf16Be,
            (1, 0) => Encoding::MacRoman,
            (3, 0) | (3, 1) | (3, 10) => Encoding::Utf16Be,
            _ => Encoding::Unknown,
        }
    }

    /// Decode raw bytes, replacing anything malformed with U+FFFD.
    ///
    /// Returns `None` if the encoding is unknown.
    pub fn decode(self, raw: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf16Be => {
                let units = raw
                    .chunks(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]));
                Some(
                    char::decode_utf16(units)
                        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                        .collect(),
                )
            }
            Encoding::MacRoman => Some(raw.iter().map(|b| MacRomanMapping.decode(*b)).collect()),
            Encoding::Unknown => None,
        }
    }

    /// Encode a string, returning `None` if it contains a character the
    /// encoding can't represent.
    pub fn encode(self, string: &str) -> Option<Vec<u8>> {
        match self {
            Encoding::Utf16Be => Some(
                string
                    .encode_utf16()
                    .flat_map(|unit| unit.to_be_bytes())
                    .collect(),
            ),
            Encoding::MacRoman => string.chars().map(|c| MacRomanMapping.encode(c)).collect(),
            Encoding::Unknown => None,
        }
    }
}

impl NameRecord {
    /// A Windows Unicode BMP record in US English.
    pub fn new_windows(name_id: u16, string: &str) -> Self {
        NameRecord {
            platform_id: 3,
            encoding_id: 1,
            language_id: 0x409,
            name_id,
            string: string
                .encode_utf16()
                .flat_map(|unit| unit.to_be_bytes())
                .collect(),
        }
    }

    /// A Macintosh Roman record in English, or `None` if the string can't
    /// be represented in Mac Roman.
    pub fn new_mac_roman(name_id: u16, string: &str) -> Option<Self> {
        Some(NameRecord {
            platform_id: 1,
            encoding_id: 0,
            language_id: 0,
            name_id,
            string: Encoding::MacRoman.encode(string)?,
        })
    }

    pub fn encoding(&self) -> Encoding {
        Encoding::new(self.platform_id, self.encoding_id)
    }

    /// The decoded string, or `None` if the encoding is not supported.
    pub fn to_string_lossy(&self) -> Option<String> {
        self.encoding().decode(&self.string)
    }
}

impl LangTagRecord {
    pub fn new(tag: &str) -> Self {
        LangTagRecord {
            lang_tag: tag.encode_utf16().flat_map(|unit| unit.to_be_bytes()).collect(),
        }
    }

    pub fn to_string_lossy(&self) -> String {
        Encoding::Utf16Be
            .decode(&self.lang_tag)
            .unwrap_or_default()
    }
}

impl FontRead for Name {
    fn read(data: FontData<'_>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: u16 = cursor.read()?;
        if version > 1 {
            return Err(ReadError::InvalidFormat(version as _));
        }
        let count: u16 = cursor.read()?;
        let storage_offset = cursor.read::<u16>()? as usize;
        let string_at = |offset: u16, length: u16| -> Result<Vec<u8>, ReadError> {
            let start = storage_offset + offset as usize;
            data.slice(start..start + length as usize)
                .map(|bytes| bytes.as_bytes().to_vec())
                .ok_or(ReadError::OutOfBounds)
        };

        let mut offsets = Vec::new();
        let mut name_records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let platform_id = cursor.read()?;
            let encoding_id = cursor.read()?;
            let language_id = cursor.read()?;
            let name_id = cursor.read()?;
            let length = cursor.read()?;
            let offset = cursor.read()?;
            offsets.push(offset);
            name_records.push(NameRecord {
                platform_id,
                encoding_id,
                language_id,
                name_id,
                string: string_at(offset, length)?,
            });
        }
        let lang_tag_records = if version == 1 {
            let count: u16 = cursor.read()?;
            let records = (0..count)
                .map(|_| {
                    let length = cursor.read()?;
                    let offset = cursor.read()?;
                    offsets.push(offset);
                    string_at(offset, length).map(|lang_tag| LangTagRecord { lang_tag })
                })
                .collect::<Result<_, _>>()?;
            Some(records)
        } else {
            None
        };
        let mut name = Name {
            name_records,
            lang_tag_records,
            storage: None,
        };
        // storage that doesn't start right after the records can't be kept
        if name.compute_storage_offset() == storage_offset {
            name.storage = data.split_off(storage_offset).map(|storage| StringStorage {
                data: storage.as_bytes().to_vec(),
                offsets,
            });
        }
        Ok(name)
    }
}

impl FontWrite for Name {
    fn write_into(&self, writer: &mut TableWriter) {
        let (storage, offsets) = self.compile_storage();
        let mut offsets = offsets.into_iter();
        self.compute_version().write_into(writer);
        (self.name_records.len() as u16).write_into(writer);
        (self.compute_storage_offset() as u16).write_into(writer);
        for (record, offset) in self.name_records.iter().zip(offsets.by_ref()) {
            record.platform_id.write_into(writer);
            record.encoding_id.write_into(writer);
            record.language_id.write_into(writer);
            record.name_id.write_into(writer);
            (record.string.len() as u16).write_into(writer);
            (offset as u16).write_into(writer);
        }
        if let Some(lang_tags) = &self.lang_tag_records {
            (lang_tags.len() as u16).write_into(writer);
            for (record, offset) in lang_tags.iter().zip(offsets) {
                (record.lang_tag.len() as u16).write_into(writer);
                (offset as u16).write_into(writer);
            }
        }
        writer.write_slice(&storage);
    }
}

impl Validate for Name {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("name", |ctx| {
            if self.name_records.len() > u16::MAX as usize {
                ctx.report("too many name records");
            }
            ctx.in_field("name_records", |ctx| {
                ctx.in_array(&self.name_records, |ctx, record| {
                    if record.string.len() > u16::MAX as usize {
                        ctx.report("string is too long");
                    }
                })
            });
            let (storage, offsets) = self.compile_storage();
            if offsets.iter().any(|off| *off > u16::MAX as usize) {
                ctx.report("string storage overflows 16-bit offsets");
            }
            if self.compute_storage_offset() > u16::MAX as usize {
                ctx.report("too many records for a 16-bit storage offset");
            }
            log::trace!("name storage is {} bytes", storage.len());
        })
    }
}

/// A helper for encoding and decoding Mac OS Roman encoded strings.
pub struct MacRomanMapping;

impl MacRomanMapping {
    const START_REMAP: u8 = 128;

    /// Convert from a mac-roman encoded byte to a `char`
    pub fn decode(self, raw: u8) -> char {
        if raw < Self::START_REMAP {
            raw as char
        } else {
            let unicode = MAC_ROMAN_DECODE[(raw - Self::START_REMAP) as usize];
            char::from_u32(unicode as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
        }
    }

    /// Convert a `char` to a mac-roman byte, if it is in the mac-roman charset.
    pub fn encode(self, c: char) -> Option<u8> {
        let raw: u16 = (c as u32).try_into().ok()?;
        if raw < Self::START_REMAP as u16 {
            return Some(raw as u8);
        }
        MAC_ROMAN_DECODE
            .iter()
            .position(|unicode| *unicode == raw)
            .map(|idx| idx as u8 + Self::START_REMAP)
    }
}

/// The unicode values of mac-roman bytes 128..=255.
#[rustfmt::skip]
static MAC_ROMAN_DECODE: [u16; 128] = [
    196, 197, 199, 201, 209, 214, 220, 225, 224, 226, 228, 227, 229, 231, 233,
    232, 234, 235, 237, 236, 238, 239, 241, 243, 242, 244, 246, 245, 250, 249,
    251, 252, 8224, 176, 162, 163, 167, 8226, 182, 223, 174, 169, 8482, 180,
    168, 8800, 198, 216, 8734, 177, 8804, 8805, 165, 181, 8706, 8721, 8719,
    960, 8747, 170, 186, 937, 230, 248, 191, 161, 172, 8730, 402, 8776, 8710,
    171, 187, 8230, 160, 192, 195, 213, 338, 339, 8211, 8212, 8220, 8221, 8216,
    8217, 247, 9674, 255, 376, 8260, 8364, 8249, 8250, 64257, 64258, 8225, 183,
    8218, 8222, 8240, 194, 202, 193, 203, 200, 205, 206, 207, 204, 211, 212,
    63743, 210, 218, 219, 217, 305, 710, 732, 175, 728, 729, 730, 184, 733,
    731, 711,
];
