//! A directory of all the font tables.

use font_types::Tag;

use crate::error::Error;

pub mod cff;
pub mod cmap;
pub mod cvt;
pub mod dsig;
pub mod fpgm;
pub mod gdef;
pub mod glyf;
pub mod hdmx;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod kern;
pub mod layout;
pub mod loca;
pub mod maxp;
pub mod name;
pub mod os2;
pub mod post;
pub mod prep;

/// A table that has an associated tag in the table directory.
pub trait TopLevelTable {
    /// The tag used to identify this table.
    const TAG: Tag;
}

/// Access to a specific table type stored in a [`Table`].
pub trait FromTable: TopLevelTable + Into<Table> + Sized {
    fn from_table(table: &Table) -> Option<&Self>;
    fn from_table_mut(table: &mut Table) -> Option<&mut Self>;
}

macro_rules! font_tables {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// A decoded top-level table.
        #[derive(Clone, Debug, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum Table {
            $( $variant($ty), )*
            /// A table we do not interpret, kept as raw bytes.
            Unknown(Vec<u8>),
        }

        impl Table {
            /// Serialize this table.
            ///
            /// Tables that depend on other tables (such as `loca`) are written
            /// as they are; keeping them in sync is the job of
            /// [`Font::encode`](crate::Font::encode).
            pub fn compile(&self) -> Result<Vec<u8>, Error> {
                match self {
                    $( Table::$variant(table) => crate::write::dump_table(table), )*
                    Table::Unknown(bytes) => Ok(bytes.clone()),
                }
            }

            /// The tag of the table type, or `None` for unknown tables.
            pub fn tag(&self) -> Option<Tag> {
                match self {
                    $( Table::$variant(_) => Some(<$ty>::TAG), )*
                    Table::Unknown(_) => None,
                }
            }
        }

        $(
            impl From<$ty> for Table {
                fn from(src: $ty) -> Table {
                    Table::$variant(src)
                }
            }

            impl FromTable for $ty {
                fn from_table(table: &Table) -> Option<&Self> {
                    match table {
                        Table::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_table_mut(table: &mut Table) -> Option<&mut Self> {
                    match table {
                        Table::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

font_tables!(
    Head(head::Head),
    Hhea(hhea::Hhea),
    Maxp(maxp::Maxp),
    Hmtx(hmtx::Hmtx),
    Loca(loca::Loca),
    Glyf(glyf::Glyf),
    Cmap(cmap::Cmap),
    Name(name::Name),
    Os2(os2::Os2),
    Post(post::Post),
    Cvt(cvt::Cvt),
    Fpgm(fpgm::Fpgm),
    Prep(prep::Prep),
    Hdmx(hdmx::Hdmx),
    Kern(kern::Kern),
    Gdef(gdef::Gdef),
    Cff(cff::Cff),
    Cff2(cff::Cff2),
    Dsig(dsig::Dsig),
);

impl Table {
    /// Non-fatal problems noticed while decoding this table.
    ///
    /// These are subtables in formats we do not interpret; they are kept as
    /// raw bytes and written back unchanged.
    pub fn decode_warnings(&self) -> Vec<String> {
        match self {
            Table::Cmap(cmap) => cmap
                .encoding_records
                .iter()
                .filter_map(|record| match &record.subtable {
                    cmap::CmapSubtable::Unknown(raw) => Some(format!(
                        "unsupported cmap subtable format {} (platform {}, encoding {})",
                        raw.format, record.platform_id, record.encoding_id
                    )),
                    _ => None,
                })
                .collect(),
            Table::Cff(cff) if cff.major_version() != Some(1) => {
                vec![format!(
                    "unsupported CFF major version {:?}",
                    cff.major_version()
                )]
            }
            Table::Cff2(cff2) if cff2.major_version() != Some(2) => {
                vec![format!(
                    "unsupported CFF2 major version {:?}",
                    cff2.major_version()
                )]
            }
            Table::Kern(kern) => kern
                .subtables
                .iter()
                .filter_map(|sub| match &sub.data {
                    kern::KernSubtableData::Other { format, .. } => {
                        Some(format!("unsupported kern subtable format {format}"))
                    }
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}
