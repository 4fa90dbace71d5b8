//! Tree storage primitive.
//!
//! [`TreeStorage`] is the low-level ordered tree the store sits on: sibling
//! lists, parent links and cell values, addressed by [`NodeId`]. It knows
//! nothing about versions or caching. [`NodeArena`] is the implementation
//! used by default.
//!
//! Implementations must keep a [`NodeId`] stable for as long as its node
//! exists, and must never resolve it again once the node is removed.

mod arena;

pub use arena::NodeArena;

use crate::value::CellValue;

/// Reference to a node slot, tagged with the slot generation.
///
/// A slot's generation changes when its node is freed, so an id held past
/// the removal of its node fails [`TreeStorage::contains`] even after the
/// slot has been reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in the storage.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this id was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

/// Ordered tree with per-node cells.
///
/// `parent == None` addresses the top level throughout. Methods taking a
/// `NodeId` return `None`/`false`/empty for ids that do not resolve.
pub trait TreeStorage {
    /// Number of cells held by every node.
    fn column_count(&self) -> usize;

    /// Check whether `node` refers to a live node.
    fn contains(&self, node: NodeId) -> bool;

    /// First child of `parent`.
    fn first_child(&self, parent: Option<NodeId>) -> Option<NodeId>;

    /// Child of `parent` at `index`.
    fn nth_child(&self, parent: Option<NodeId>, index: usize) -> Option<NodeId>;

    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId>;

    /// Parent of `node`, `None` for top-level nodes.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Number of direct children of `parent`.
    fn child_count(&self, parent: Option<NodeId>) -> usize;

    /// Insert a new empty node immediately before `sibling`.
    fn insert_before(&mut self, sibling: NodeId) -> Option<NodeId>;

    /// Insert a new empty node immediately after `sibling`.
    fn insert_after(&mut self, sibling: NodeId) -> Option<NodeId>;

    /// Append a new empty node as the last child of `parent`.
    fn append_child(&mut self, parent: Option<NodeId>) -> Option<NodeId>;

    /// Remove `node` and its whole subtree.
    ///
    /// Returns the ids of every freed node, `node` first. Empty if `node`
    /// did not resolve.
    fn remove(&mut self, node: NodeId) -> Vec<NodeId>;

    fn cell(&self, node: NodeId, column: usize) -> Option<&CellValue>;

    /// Overwrite a cell. Returns `false` if the node or column is missing.
    fn set_cell(&mut self, node: NodeId, column: usize, value: CellValue) -> bool;

    /// Remove every node.
    fn clear(&mut self);

    /// Position of `node` among its siblings.
    ///
    /// Linear in the index; only used for change notifications.
    fn index_of(&self, node: NodeId) -> Option<usize> {
        if !self.contains(node) {
            return None;
        }
        let mut index = 0;
        let mut current = node;
        while let Some(prev) = self.prev_sibling(current) {
            current = prev;
            index += 1;
        }
        Some(index)
    }
}
