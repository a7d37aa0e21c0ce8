//! Ordering serialized subtables.
//!
//! Every table and subtable written through a [`TableWriter`] becomes a node
//! in a graph, with offsets as edges. Before the final bytes are produced the
//! nodes are sorted so that each object comes after all of its parents; this
//! keeps every offset positive.
//!
//! [`TableWriter`]: crate::write::TableWriter

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::write::TableData;

/// An identifier for an object in the compilation graph.
#[derive(Debug, Clone, Copy, PartialOrd, Ord, Hash, PartialEq, Eq)]
pub struct ObjectId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OffsetLen {
    Offset16 = 2,
    Offset32 = 4,
}

impl OffsetLen {
    /// The maximum value for an offset of this length.
    pub const fn max_value(self) -> u32 {
        match self {
            Self::Offset16 => u16::MAX as u32,
            Self::Offset32 => u32::MAX,
        }
    }
}

impl std::fmt::Display for OffsetLen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offset16 => write!(f, "Offset16"),
            Self::Offset32 => write!(f, "Offset32"),
        }
    }
}

/// Deduplicating storage for finished objects.
///
/// Byte-identical objects with identical offsets share a single id, and so
/// are only written once.
#[derive(Debug, Default)]
pub(crate) struct ObjectStore {
    objects: HashMap<TableData, ObjectId>,
}

impl ObjectStore {
    pub(crate) fn add(&mut self, data: TableData) -> ObjectId {
        let next = ObjectId(self.objects.len() as u32);
        *self.objects.entry(data).or_insert(next)
    }
}

/// A graph of subtables, starting at a single root.
pub(crate) struct Graph {
    pub(crate) objects: BTreeMap<ObjectId, TableData>,
    pub(crate) order: Vec<ObjectId>,
    root: ObjectId,
}

impl Graph {
    pub(crate) fn from_obj_store(store: ObjectStore, root: ObjectId) -> Self {
        let objects = store.objects.into_iter().map(|(k, v)| (v, k)).collect();
        Graph {
            objects,
            order: Vec::new(),
            root,
        }
    }

    /// Sort objects breadth-first from the root, never placing an object
    /// before any of its parents.
    ///
    /// A parent that points at the same child more than once counts once.
    pub(crate) fn topological_sort(&mut self) {
        let mut n_parents: HashMap<ObjectId, usize> = HashMap::new();
        for data in self.objects.values() {
            for child in unique_children(data) {
                *n_parents.entry(child).or_default() += 1;
            }
        }

        let mut order = Vec::with_capacity(self.objects.len());
        let mut queue = VecDeque::from([self.root]);
        while let Some(next) = queue.pop_front() {
            order.push(next);
            let Some(data) = self.objects.get(&next) else {
                continue;
            };
            for child in unique_children(data) {
                let remaining = n_parents.entry(child).or_default();
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    queue.push_back(child);
                }
            }
        }
        self.order = order;
    }
}

/// The children of an object, in offset order, without repeats.
fn unique_children(data: &TableData) -> Vec<ObjectId> {
    let mut seen = HashSet::new();
    data.children().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_child_after_all_parents() {
        // root -> a, root -> c, a -> b, b -> c
        let mut store = ObjectStore::default();
        let c = store.add(TableData::make_mock(3));
        let mut b_data = TableData::make_mock(1);
        b_data.add_mock_offset(c, OffsetLen::Offset16);
        let b = store.add(b_data);
        let mut a_data = TableData::make_mock(2);
        a_data.add_mock_offset(b, OffsetLen::Offset16);
        let a = store.add(a_data);
        let mut root_data = TableData::make_mock(4);
        root_data.add_mock_offset(a, OffsetLen::Offset16);
        root_data.add_mock_offset(c, OffsetLen::Offset16);
        let root = store.add(root_data);

        let mut graph = Graph::from_obj_store(store, root);
        graph.topological_sort();
        assert_eq!(graph.order, vec![root, a, b, c]);
    }

    #[test]
    fn identical_objects_share_an_id() {
        let mut store = ObjectStore::default();
        let one = store.add(TableData::make_mock(5));
        let two = store.add(TableData::make_mock(5));
        let three = store.add(TableData::make_mock(6));
        assert_eq!(one, two);
        assert_ne!(one, three);
    }
}
