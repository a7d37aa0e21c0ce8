//! Serializing tables to bytes.

use std::collections::HashMap;

use crate::{
    error::Error,
    graph::{Graph, ObjectId, ObjectStore, OffsetLen},
    validate::Validate,
};

/// A type that that can be written out as part of a font file.
///
/// This both handles writing big-endian bytes as well as describing the
/// relationship between tables and their subtables.
pub trait FontWrite {
    /// Write our data and information about offsets into this [TableWriter].
    fn write_into(&self, writer: &mut TableWriter);
}

/// An object that manages a collection of serialized tables.
///
/// This handles deduplicating objects and tracking offsets.
#[derive(Debug)]
pub struct TableWriter {
    /// Finished tables, associated with an ObjectId; duplicate tables share an id.
    tables: ObjectStore,
    /// Tables currently being written.
    ///
    /// Tables are processed as they are encountered (as subtables)
    stack: Vec<TableData>,
}

/// Attempt to serialize a table.
///
/// The table is validated first; if it is malformed this returns
/// [`Error::ValidationFailed`]. An offset that does not fit in its field
/// produces [`Error::OffsetOverflow`].
pub fn dump_table<T: FontWrite + Validate>(table: &T) -> Result<Vec<u8>, Error> {
    table.validate()?;
    let mut writer = TableWriter::default();
    table.write_into(&mut writer);
    let mut graph = writer.finish();
    graph.topological_sort();
    dump_impl(&graph.order, &graph.objects)
}

fn dump_impl(
    order: &[ObjectId],
    nodes: &std::collections::BTreeMap<ObjectId, TableData>,
) -> Result<Vec<u8>, Error> {
    let mut positions = HashMap::new();
    let mut out = Vec::new();

    // first pass: write out bytes, record positions of objects
    for id in order {
        let Some(node) = nodes.get(id) else { continue };
        positions.insert(*id, out.len());
        out.extend_from_slice(&node.bytes);
    }

    // second pass: patch offsets, relative to the start of the parent
    for id in order {
        let (Some(node), Some(&parent_pos)) = (nodes.get(id), positions.get(id)) else {
            continue;
        };
        for offset in &node.offsets {
            let Some(&child_pos) = positions.get(&offset.object) else {
                continue;
            };
            let resolved = child_pos - parent_pos;
            let buffer_pos = parent_pos + offset.pos as usize;
            write_offset(&mut out[buffer_pos..], offset.len, resolved)?;
        }
    }
    Ok(out)
}

fn write_offset(at: &mut [u8], len: OffsetLen, resolved: usize) -> Result<(), Error> {
    if resolved > len.max_value() as usize {
        return Err(Error::OffsetOverflow {
            len,
            value: resolved,
        });
    }
    match len {
        OffsetLen::Offset16 => at[..2].copy_from_slice(&(resolved as u16).to_be_bytes()),
        OffsetLen::Offset32 => at[..4].copy_from_slice(&(resolved as u32).to_be_bytes()),
    }
    Ok(())
}

impl TableWriter {
    fn add_table(&mut self, table: &dyn FontWrite) -> ObjectId {
        self.stack.push(TableData::default());
        table.write_into(self);
        let data = self.stack.pop().unwrap_or_default();
        self.tables.add(data)
    }

    /// Finish this table, returning an object graph.
    fn finish(mut self) -> Graph {
        let root = self.stack.pop().unwrap_or_default();
        let id = self.tables.add(root);
        Graph::from_obj_store(self.tables, id)
    }

    fn current(&mut self) -> &mut TableData {
        if self.stack.is_empty() {
            self.stack.push(TableData::default());
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Write raw bytes into this table.
    ///
    /// The caller is responsible for ensuring bytes are in big-endian order.
    #[inline]
    pub fn write_slice(&mut self, bytes: &[u8]) {
        self.current().bytes.extend_from_slice(bytes)
    }

    /// The number of bytes written so far to the current table.
    pub fn current_len(&self) -> usize {
        self.stack.last().map(|data| data.bytes.len()).unwrap_or_default()
    }

    /// Create an offset to another table.
    ///
    /// The `width` argument is the size in bytes of the offset, e.g. 2 for
    /// an `Offset16`, and 4 for an `Offset32`.
    ///
    /// The provided table is serialized immediately, and the position of the
    /// offset within the current table is recorded. Offsets are resolved when
    /// the root table is dumped, relative to the start of the current table.
    pub fn write_offset(&mut self, obj: &dyn FontWrite, width: usize) {
        let obj_id = self.add_table(obj);
        self.current().add_offset(obj_id, width);
    }

    /// Write an offset if `obj` is present, otherwise write a null offset.
    pub fn write_nullable_offset(&mut self, obj: Option<&dyn FontWrite>, width: usize) {
        match obj {
            Some(obj) => self.write_offset(obj, width),
            None => self.write_slice(&[0u8; 4][..width.min(4)]),
        }
    }

    /// Write zeros until the current table is a multiple of two bytes long.
    pub fn pad_to_2byte_aligned(&mut self) {
        if self.current_len() % 2 != 0 {
            self.write_slice(&[0]);
        }
    }

    /// Write zeros until the current table is a multiple of four bytes long.
    pub fn pad_to_4byte_aligned(&mut self) {
        let pad = (4 - self.current_len() % 4) % 4;
        self.write_slice(&[0u8; 3][..pad]);
    }

    /// Return the bytes of a table that contains no offsets.
    pub(crate) fn into_data(mut self) -> Vec<u8> {
        let result = self.stack.pop().unwrap_or_default();
        debug_assert!(result.offsets.is_empty());
        result.bytes
    }
}

impl Default for TableWriter {
    fn default() -> Self {
        TableWriter {
            tables: ObjectStore::default(),
            stack: vec![TableData::default()],
        }
    }
}

/// The encoded data for a given table, along with info on included offsets
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq)]
pub(crate) struct TableData {
    pub(crate) bytes: Vec<u8>,
    pub(crate) offsets: Vec<OffsetRecord>,
}

/// The position and type of an offset, along with the id of the pointed-to entity
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub(crate) struct OffsetRecord {
    /// the position of the offset within the parent table
    pos: u32,
    /// the offset length in bytes
    pub(crate) len: OffsetLen,
    /// The object pointed to by the offset
    pub(crate) object: ObjectId,
}

impl TableData {
    fn add_offset(&mut self, object: ObjectId, width: usize) {
        let len = match width {
            2 => OffsetLen::Offset16,
            _ => OffsetLen::Offset32,
        };
        self.offsets.push(OffsetRecord {
            pos: self.bytes.len() as u32,
            len,
            object,
        });
        self.bytes.extend_from_slice(&[0u8; 4][..len as usize]);
    }

    pub(crate) fn children(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.offsets.iter().map(|off| off.object)
    }

    #[cfg(test)]
    pub(crate) fn make_mock(size: usize) -> Self {
        TableData {
            bytes: vec![0xca; size], // has no special meaning
            offsets: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn add_mock_offset(&mut self, object: ObjectId, len: OffsetLen) {
        let pos = self.offsets.iter().map(|off| off.len as u8 as u32).sum();
        self.offsets.push(OffsetRecord { pos, len, object });
    }
}

/// Raw bytes that are the target of an offset, such as an opaque subtable.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RawBytes<'a>(pub(crate) &'a [u8]);

impl FontWrite for RawBytes<'_> {
    fn write_into(&self, writer: &mut TableWriter) {
        writer.write_slice(self.0)
    }
}

macro_rules! write_be_bytes {
    ($ty:ty) => {
        impl FontWrite for $ty {
            #[inline]
            fn write_into(&self, writer: &mut TableWriter) {
                writer.write_slice(font_types::Scalar::to_raw(*self).as_ref())
            }
        }
    };
}

//NOTE: not implemented for offsets! it would be too easy to accidentally write them.
write_be_bytes!(u8);
write_be_bytes!(i8);
write_be_bytes!(u16);
write_be_bytes!(i16);
write_be_bytes!(u32);
write_be_bytes!(i32);
write_be_bytes!(i64);
write_be_bytes!(font_types::F2Dot14);
write_be_bytes!(font_types::Fixed);
write_be_bytes!(font_types::LongDateTime);
write_be_bytes!(font_types::Tag);
write_be_bytes!(font_types::Version16Dot16);
write_be_bytes!(font_types::GlyphId16);

impl<T: FontWrite> FontWrite for [T] {
    fn write_into(&self, writer: &mut TableWriter) {
        self.iter().for_each(|item| item.write_into(writer))
    }
}

impl<T: FontWrite> FontWrite for Vec<T> {
    fn write_into(&self, writer: &mut TableWriter) {
        self.as_slice().write_into(writer)
    }
}
