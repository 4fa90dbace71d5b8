//! Client-held position handles.

use crate::storage::NodeId;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identity of a [`TreeStore`](super::TreeStore) instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoreId(u32);

impl StoreId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Opaque handle to a node of a [`TreeStore`](super::TreeStore).
///
/// Handles are immutable snapshots: the node they point at and the store
/// version at which they were produced. The store keeps its lookup caches
/// on its own side, so copies of a handle can never disagree.
///
/// A handle whose [`stamp`](Self::stamp) is behind the store version is
/// stale but still usable as long as its node exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreePosition {
    store: StoreId,
    node: NodeId,
    stamp: u64,
}

impl TreePosition {
    pub(crate) const fn new(store: StoreId, node: NodeId, stamp: u64) -> Self {
        Self { store, node, stamp }
    }

    /// Storage node this handle refers to.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Store version at the time this handle was produced.
    #[must_use]
    pub const fn stamp(&self) -> u64 {
        self.stamp
    }

    #[must_use]
    pub const fn store(&self) -> StoreId {
        self.store
    }

    /// Check whether both handles refer to the same node, whatever their stamps.
    #[must_use]
    pub fn same_node(&self, other: &Self) -> bool {
        self.store == other.store && self.node == other.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_ids_are_unique() {
        let a = StoreId::next();
        let b = StoreId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_node_ignores_stamp() {
        let store = StoreId::next();
        let node = NodeId::new(3, 1);
        let old = TreePosition::new(store, node, 1);
        let new = TreePosition::new(store, node, 9);
        assert_ne!(old, new);
        assert!(old.same_node(&new));
        assert_eq!(new.stamp(), 9);
        assert_eq!(new.node(), node);
    }

    #[test]
    fn test_same_node_checks_store() {
        let node = NodeId::new(0, 0);
        let a = TreePosition::new(StoreId::next(), node, 0);
        let b = TreePosition::new(StoreId::next(), node, 0);
        assert!(!a.same_node(&b));
    }
}
