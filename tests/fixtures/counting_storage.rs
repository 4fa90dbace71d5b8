//! Storage wrapper that records how often each primitive was called.

use std::cell::Cell;
use treestore_rust::{CellValue, NodeArena, NodeId, TreeStorage};

/// Per-primitive call counters.
#[derive(Debug, Default)]
pub struct CallCounts {
    pub first_child: Cell<u64>,
    pub nth_child: Cell<u64>,
    pub next_sibling: Cell<u64>,
    pub child_count: Cell<u64>,
}

impl CallCounts {
    fn bump(counter: &Cell<u64>) {
        counter.set(counter.get() + 1);
    }

    pub fn reset(&self) {
        self.first_child.set(0);
        self.nth_child.set(0);
        self.next_sibling.set(0);
        self.child_count.set(0);
    }
}

/// [`NodeArena`] that counts navigation calls made by the store.
#[derive(Debug)]
pub struct CountingStorage {
    inner: NodeArena,
    pub calls: CallCounts,
}

impl CountingStorage {
    pub fn new(columns: usize) -> Self {
        Self {
            inner: NodeArena::new(columns),
            calls: CallCounts::default(),
        }
    }
}

impl TreeStorage for CountingStorage {
    fn column_count(&self) -> usize {
        self.inner.column_count()
    }

    fn contains(&self, node: NodeId) -> bool {
        self.inner.contains(node)
    }

    fn first_child(&self, parent: Option<NodeId>) -> Option<NodeId> {
        CallCounts::bump(&self.calls.first_child);
        self.inner.first_child(parent)
    }

    fn nth_child(&self, parent: Option<NodeId>, index: usize) -> Option<NodeId> {
        CallCounts::bump(&self.calls.nth_child);
        self.inner.nth_child(parent, index)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        CallCounts::bump(&self.calls.next_sibling);
        self.inner.next_sibling(node)
    }

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.inner.prev_sibling(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.parent(node)
    }

    fn child_count(&self, parent: Option<NodeId>) -> usize {
        CallCounts::bump(&self.calls.child_count);
        self.inner.child_count(parent)
    }

    fn insert_before(&mut self, sibling: NodeId) -> Option<NodeId> {
        self.inner.insert_before(sibling)
    }

    fn insert_after(&mut self, sibling: NodeId) -> Option<NodeId> {
        self.inner.insert_after(sibling)
    }

    fn append_child(&mut self, parent: Option<NodeId>) -> Option<NodeId> {
        self.inner.append_child(parent)
    }

    fn remove(&mut self, node: NodeId) -> Vec<NodeId> {
        self.inner.remove(node)
    }

    fn cell(&self, node: NodeId, column: usize) -> Option<&CellValue> {
        self.inner.cell(node, column)
    }

    fn set_cell(&mut self, node: NodeId, column: usize, value: CellValue) -> bool {
        self.inner.set_cell(node, column, value)
    }

    fn clear(&mut self) {
        self.inner.clear();
    }
}
