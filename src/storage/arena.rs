//! Slot arena implementation of [`TreeStorage`].
//!
//! Nodes live in a flat `Vec` of slots linked into doubly-linked sibling
//! lists. Freed slots go on a free-list for O(1) reuse and have their
//! generation bumped, which is what makes stale [`NodeId`]s detectable.
//!
//! # Invariants
//!
//! - Every link (`parent`, `prev`, `next`, `first`, `last`) points at an
//!   occupied slot
//! - `Links::count` equals the length of the sibling chain it heads
//! - A slot's generation only ever changes when the slot is freed

use super::{NodeId, TreeStorage};
use crate::value::CellValue;

/// Head of a sibling chain.
#[derive(Clone, Copy, Debug, Default)]
struct Links {
    first: Option<u32>,
    last: Option<u32>,
    count: usize,
}

#[derive(Clone, Debug, Default)]
struct Node {
    parent: Option<u32>,
    prev: Option<u32>,
    next: Option<u32>,
    children: Links,
    cells: Vec<CellValue>,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    occupied: bool,
    node: Node,
}

/// Arena-backed ordered tree.
///
/// # Thread Safety
///
/// `NodeArena` is not thread-safe. For concurrent access, wrap in appropriate
/// synchronization primitives (e.g., `Mutex` or `RwLock`).
#[derive(Clone, Debug)]
pub struct NodeArena {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    roots: Links,
    columns: usize,
    len: usize,
}

impl NodeArena {
    /// Create an empty arena whose nodes carry `columns` cells.
    #[must_use]
    pub fn new(columns: usize) -> Self {
        Self::with_capacity(columns, 0)
    }

    /// Create an arena with room for `capacity` nodes before reallocating.
    #[must_use]
    pub fn with_capacity(columns: usize, capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            roots: Links::default(),
            columns,
            len: 0,
        }
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots ever allocated (live and free).
    #[must_use]
    pub fn total_slots(&self) -> usize {
        self.slots.len()
    }

    /// Number of freed slots waiting for reuse.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    fn id(&self, index: u32) -> NodeId {
        NodeId::new(index, self.slots[index as usize].generation)
    }

    fn resolve_index(&self, id: NodeId) -> Option<u32> {
        let slot = self.slots.get(id.index() as usize)?;
        (slot.occupied && slot.generation == id.generation()).then_some(id.index())
    }

    fn resolve(&self, id: NodeId) -> Option<&Node> {
        self.resolve_index(id)
            .map(|index| &self.slots[index as usize].node)
    }

    fn node(&self, index: u32) -> &Node {
        &self.slots[index as usize].node
    }

    fn node_mut(&mut self, index: u32) -> &mut Node {
        &mut self.slots[index as usize].node
    }

    fn links(&self, parent: Option<u32>) -> &Links {
        match parent {
            None => &self.roots,
            Some(index) => &self.node(index).children,
        }
    }

    fn links_mut(&mut self, parent: Option<u32>) -> &mut Links {
        match parent {
            None => &mut self.roots,
            Some(index) => &mut self.node_mut(index).children,
        }
    }

    fn parent_index(&self, parent: Option<NodeId>) -> Option<Option<u32>> {
        match parent {
            None => Some(None),
            Some(id) => self.resolve_index(id).map(Some),
        }
    }

    /// Take a slot for a new, unlinked node.
    fn alloc(&mut self) -> Option<u32> {
        let node = Node {
            cells: vec![CellValue::Empty; self.columns],
            ..Node::default()
        };
        let index = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = node;
            slot.occupied = true;
            index
        } else {
            let index = u32::try_from(self.slots.len()).ok()?;
            self.slots.push(Slot {
                generation: 0,
                occupied: true,
                node,
            });
            index
        };
        self.len += 1;
        Some(index)
    }

    fn free(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        slot.occupied = false;
        slot.generation = slot.generation.wrapping_add(1);
        slot.node = Node::default();
        self.free_list.push(index);
        self.len -= 1;
    }

    /// Splice `index` into the chain under `parent` between `prev` and `next`.
    fn link(&mut self, index: u32, parent: Option<u32>, prev: Option<u32>, next: Option<u32>) {
        let node = self.node_mut(index);
        node.parent = parent;
        node.prev = prev;
        node.next = next;

        match prev {
            Some(prev) => self.node_mut(prev).next = Some(index),
            None => self.links_mut(parent).first = Some(index),
        }
        match next {
            Some(next) => self.node_mut(next).prev = Some(index),
            None => self.links_mut(parent).last = Some(index),
        }
        self.links_mut(parent).count += 1;
    }

    fn unlink(&mut self, index: u32) {
        let Node {
            parent, prev, next, ..
        } = *self.node(index);

        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.links_mut(parent).first = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.links_mut(parent).last = prev,
        }
        self.links_mut(parent).count -= 1;

        let node = self.node_mut(index);
        node.parent = None;
        node.prev = None;
        node.next = None;
    }
}

impl TreeStorage for NodeArena {
    fn column_count(&self) -> usize {
        self.columns
    }

    fn contains(&self, node: NodeId) -> bool {
        self.resolve_index(node).is_some()
    }

    fn first_child(&self, parent: Option<NodeId>) -> Option<NodeId> {
        let parent = self.parent_index(parent)?;
        self.links(parent).first.map(|index| self.id(index))
    }

    fn nth_child(&self, parent: Option<NodeId>, index: usize) -> Option<NodeId> {
        let links = *self.links(self.parent_index(parent)?);
        if index >= links.count {
            return None;
        }
        // Walk from whichever end is closer.
        let found = if index < links.count / 2 {
            let mut current = links.first?;
            for _ in 0..index {
                current = self.node(current).next?;
            }
            current
        } else {
            let mut current = links.last?;
            for _ in index + 1..links.count {
                current = self.node(current).prev?;
            }
            current
        };
        Some(self.id(found))
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.resolve(node)?.next.map(|index| self.id(index))
    }

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.resolve(node)?.prev.map(|index| self.id(index))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.resolve(node)?.parent.map(|index| self.id(index))
    }

    fn child_count(&self, parent: Option<NodeId>) -> usize {
        self.parent_index(parent)
            .map_or(0, |parent| self.links(parent).count)
    }

    fn insert_before(&mut self, sibling: NodeId) -> Option<NodeId> {
        let sibling = self.resolve_index(sibling)?;
        let Node { parent, prev, .. } = *self.node(sibling);
        let index = self.alloc()?;
        self.link(index, parent, prev, Some(sibling));
        Some(self.id(index))
    }

    fn insert_after(&mut self, sibling: NodeId) -> Option<NodeId> {
        let sibling = self.resolve_index(sibling)?;
        let Node { parent, next, .. } = *self.node(sibling);
        let index = self.alloc()?;
        self.link(index, parent, Some(sibling), next);
        Some(self.id(index))
    }

    fn append_child(&mut self, parent: Option<NodeId>) -> Option<NodeId> {
        let parent = self.parent_index(parent)?;
        let last = self.links(parent).last;
        let index = self.alloc()?;
        self.link(index, parent, last, None);
        Some(self.id(index))
    }

    fn remove(&mut self, node: NodeId) -> Vec<NodeId> {
        let Some(root) = self.resolve_index(node) else {
            return Vec::new();
        };
        self.unlink(root);

        let mut freed = Vec::new();
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            freed.push(self.id(index));
            let mut child = self.node(index).children.first;
            while let Some(current) = child {
                stack.push(current);
                child = self.node(current).next;
            }
            self.free(index);
        }
        freed
    }

    fn cell(&self, node: NodeId, column: usize) -> Option<&CellValue> {
        self.resolve(node)?.cells.get(column)
    }

    fn set_cell(&mut self, node: NodeId, column: usize, value: CellValue) -> bool {
        let Some(index) = self.resolve_index(node) else {
            return false;
        };
        match self.node_mut(index).cells.get_mut(column) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        // Generations must survive so ids issued before the clear stay dead.
        for index in 0..self.slots.len() {
            if self.slots[index].occupied {
                self.free(index as u32);
            }
        }
        self.roots = Links::default();
    }
}
