//! Naive reference tree used to check store answers.
//!
//! Nodes are identified by a label (`i64`) the tests also write into
//! column 0 of the store, so a store answer can be compared by reading it.

use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
struct ModelNode {
    parent: Option<i64>,
    children: Vec<i64>,
}

/// Tree of labels kept in plain vectors.
#[derive(Clone, Debug, Default)]
pub struct TreeModel {
    nodes: BTreeMap<i64, ModelNode>,
    roots: Vec<i64>,
    next_label: i64,
}

impl TreeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels of every live node, in ascending order.
    pub fn labels(&self) -> Vec<i64> {
        self.nodes.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children of `parent` (top level for `None`).
    pub fn children(&self, parent: Option<i64>) -> &[i64] {
        match parent {
            None => &self.roots,
            Some(label) => &self.nodes[&label].children,
        }
    }

    pub fn parent(&self, label: i64) -> Option<i64> {
        self.nodes[&label].parent
    }

    pub fn next(&self, label: i64) -> Option<i64> {
        let siblings = self.children(self.parent(label));
        let index = siblings.iter().position(|&l| l == label)?;
        siblings.get(index + 1).copied()
    }

    fn siblings_mut(&mut self, parent: Option<i64>) -> &mut Vec<i64> {
        match parent {
            None => &mut self.roots,
            Some(label) => &mut self.nodes.get_mut(&label).unwrap().children,
        }
    }

    fn fresh(&mut self, parent: Option<i64>) -> i64 {
        let label = self.next_label;
        self.next_label += 1;
        self.nodes.insert(
            label,
            ModelNode {
                parent,
                children: Vec::new(),
            },
        );
        label
    }

    pub fn add_child(&mut self, parent: Option<i64>) -> i64 {
        let label = self.fresh(parent);
        self.siblings_mut(parent).push(label);
        label
    }

    pub fn insert_before(&mut self, sibling: i64) -> i64 {
        self.insert_at(sibling, 0)
    }

    pub fn insert_after(&mut self, sibling: i64) -> i64 {
        self.insert_at(sibling, 1)
    }

    fn insert_at(&mut self, sibling: i64, offset: usize) -> i64 {
        let parent = self.parent(sibling);
        let label = self.fresh(parent);
        let siblings = self.siblings_mut(parent);
        let index = siblings.iter().position(|&l| l == sibling).unwrap();
        siblings.insert(index + offset, label);
        label
    }

    /// Remove `label` and its subtree, returning every removed label.
    pub fn remove(&mut self, label: i64) -> Vec<i64> {
        let parent = self.parent(label);
        self.siblings_mut(parent).retain(|&l| l != label);

        let mut removed = Vec::new();
        let mut stack = vec![label];
        while let Some(current) = stack.pop() {
            let node = self.nodes.remove(&current).unwrap();
            stack.extend(node.children);
            removed.push(current);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }
}
