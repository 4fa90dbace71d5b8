//! Versioned tree store with cached position lookups.
//!
//! [`TreeStore`] hands out [`TreePosition`] handles into a mutable tree and
//! resolves queries against them. Two things make it more than a thin wrapper
//! over [`TreeStorage`]:
//!
//! - **Version stamps.** Every structural mutation (clear, insert, append,
//!   remove) bumps a per-store counter. Handles and cache records carry the
//!   version they were produced at, so staleness is detected lazily on next
//!   use instead of by walking outstanding handles.
//! - **Sequential child cache.** For each parent the store remembers the
//!   last child index it resolved. A later lookup of a higher index walks
//!   forward from there, so scanning children `0, 1, 2, ..` costs amortized
//!   O(1) per step instead of O(index).
//!
//! The cache never changes an answer, only its cost.
//!
//! # Examples
//!
//! ```
//! use treestore_rust::{ColumnType, TreeStore};
//!
//! let mut store = TreeStore::new([ColumnType::Text]);
//! let docs = store.add_child(None).unwrap();
//! store.set_value(&docs, 0, "docs").unwrap();
//! for name in ["a.md", "b.md", "c.md"] {
//!     let file = store.add_child(Some(&docs)).unwrap();
//!     store.set_value(&file, 0, name).unwrap();
//! }
//!
//! let mut names = Vec::new();
//! for i in 0..store.children_count(Some(&docs)).unwrap() {
//!     let file = store.child(Some(&docs), i).unwrap().unwrap();
//!     names.push(store.value(&file, 0).unwrap().to_string());
//! }
//! assert_eq!(names, ["a.md", "b.md", "c.md"]);
//! ```

mod cache;
mod events;
mod position;

pub use cache::CacheStats;
pub use events::{TreeEvents, TreeStoreEvent};
pub use position::{StoreId, TreePosition};

use crate::error::{Error, InvalidPositionKind, Result};
use crate::event::{LogLevel, emit_log_with};
use crate::storage::{NodeArena, NodeId, TreeStorage};
use crate::value::{CellValue, ColumnType};
use cache::ChildCache;
use events::Listener;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;

/// Tree store configuration.
#[derive(Clone, Copy, Debug)]
pub struct TreeStoreOptions {
    /// Cache last-child indices and child counts per parent. When off, every
    /// lookup goes to the storage.
    pub cache_lookups: bool,
    /// Notifications enabled from the start.
    pub events: TreeEvents,
    /// Nodes to pre-allocate in the default arena storage.
    pub capacity: usize,
}

impl Default for TreeStoreOptions {
    fn default() -> Self {
        Self {
            cache_lookups: true,
            events: TreeEvents::empty(),
            capacity: 0,
        }
    }
}

/// Hierarchical data store addressed by [`TreePosition`] handles.
///
/// The root is not a node: top-level queries take `None` as the position.
///
/// # Thread Safety
///
/// Lookups update cache records and therefore take `&mut self`. The store
/// does no locking of its own; share it behind a `Mutex` if needed.
pub struct TreeStore<S: TreeStorage = NodeArena> {
    id: StoreId,
    storage: S,
    columns: Vec<ColumnType>,
    version: u64,
    cache: HashMap<NodeId, ChildCache>,
    options: TreeStoreOptions,
    events: TreeEvents,
    listener: Option<Listener>,
    stats: CacheStats,
}

impl TreeStore<NodeArena> {
    /// Create an empty store with the given column types.
    #[must_use]
    pub fn new(columns: impl Into<Vec<ColumnType>>) -> Self {
        Self::with_options(columns, TreeStoreOptions::default())
    }

    /// Create an empty store with custom options.
    #[must_use]
    pub fn with_options(columns: impl Into<Vec<ColumnType>>, options: TreeStoreOptions) -> Self {
        let columns = columns.into();
        let storage = NodeArena::with_capacity(columns.len(), options.capacity);
        Self::build(storage, columns, options)
    }
}

impl<S: TreeStorage> TreeStore<S> {
    /// Create a store on top of a caller-provided storage.
    ///
    /// The storage must hold exactly one cell per declared column.
    pub fn with_storage(
        storage: S,
        columns: impl Into<Vec<ColumnType>>,
        options: TreeStoreOptions,
    ) -> Result<Self> {
        let columns = columns.into();
        if storage.column_count() != columns.len() {
            return Err(Error::ColumnCountMismatch {
                declared: columns.len(),
                storage: storage.column_count(),
            });
        }
        Ok(Self::build(storage, columns, options))
    }

    fn build(storage: S, columns: Vec<ColumnType>, options: TreeStoreOptions) -> Self {
        Self {
            id: StoreId::next(),
            storage,
            columns,
            version: 0,
            cache: HashMap::new(),
            options,
            events: options.events,
            listener: None,
            stats: CacheStats::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> StoreId {
        self.id
    }

    /// Current structural version. Strictly increases on every mutation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Column types declared at construction.
    #[must_use]
    pub fn column_types(&self) -> &[ColumnType] {
        &self.columns
    }

    #[must_use]
    pub fn options(&self) -> &TreeStoreOptions {
        &self.options
    }

    /// Underlying storage.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    /// Check whether `pos` still resolves to a node of this store.
    #[must_use]
    pub fn is_valid(&self, pos: &TreePosition) -> bool {
        self.validate(pos).is_ok()
    }

    /// Check whether `pos` was produced before the latest mutation.
    #[must_use]
    pub fn is_stale(&self, pos: &TreePosition) -> bool {
        pos.stamp() != self.version
    }

    // ============================================
    // Structural queries
    // ============================================

    /// Child of `pos` (or top-level node for `None`) at `index`.
    ///
    /// Returns `Ok(None)` when `index` is past the last child.
    pub fn child(&mut self, pos: Option<&TreePosition>, index: usize) -> Result<Option<TreePosition>> {
        let Some(pos) = pos else {
            // Top level is not cached.
            let found = if index == 0 {
                self.storage.first_child(None)
            } else {
                self.stats.direct_lookups += 1;
                self.storage.nth_child(None, index)
            };
            return Ok(found.map(|node| self.position(node)));
        };

        let parent = self.validate(pos)?;
        if !self.options.cache_lookups {
            self.stats.direct_lookups += 1;
            let found = self.storage.nth_child(Some(parent), index);
            return Ok(found.map(|node| self.position(node)));
        }

        let record = Self::record(&mut self.cache, &mut self.stats, self.version, parent);
        let resolved = match record.last_child {
            Some((cached, node)) if cached == index => {
                self.stats.hits += 1;
                Some(node)
            }
            _ if index == 0 => self.storage.first_child(Some(parent)),
            Some((cached, node)) if cached < index => {
                self.stats.forward_walks += 1;
                let mut current = node;
                for _ in cached..index {
                    let Some(next) = self.storage.next_sibling(current) else {
                        return Ok(None);
                    };
                    self.stats.forward_steps += 1;
                    current = next;
                }
                Some(current)
            }
            _ => {
                self.stats.direct_lookups += 1;
                self.storage.nth_child(Some(parent), index)
            }
        };

        let Some(node) = resolved else {
            return Ok(None);
        };
        record.last_child = Some((index, node));
        Ok(Some(self.position(node)))
    }

    /// Number of children of `pos` (or of the top level for `None`).
    pub fn children_count(&mut self, pos: Option<&TreePosition>) -> Result<usize> {
        let Some(pos) = pos else {
            return Ok(self.storage.child_count(None));
        };

        let parent = self.validate(pos)?;
        if !self.options.cache_lookups {
            return Ok(self.storage.child_count(Some(parent)));
        }

        let record = Self::record(&mut self.cache, &mut self.stats, self.version, parent);
        if let Some(count) = record.child_count {
            self.stats.hits += 1;
            return Ok(count);
        }
        let count = self.storage.child_count(Some(parent));
        record.child_count = Some(count);
        Ok(count)
    }

    /// Next sibling of `pos`.
    pub fn next(&self, pos: &TreePosition) -> Result<Option<TreePosition>> {
        let node = self.validate(pos)?;
        Ok(self
            .storage
            .next_sibling(node)
            .map(|next| self.position(next)))
    }

    /// Previous sibling lookup.
    ///
    /// Child caches only ever walk forward, so backward navigation is not
    /// offered. Always fails with [`Error::NotImplemented`].
    pub fn previous(&self, _pos: Option<&TreePosition>) -> Result<Option<TreePosition>> {
        Err(Error::NotImplemented("TreeStore::previous"))
    }

    /// Parent of `pos`, `None` for top-level nodes.
    pub fn parent(&self, pos: &TreePosition) -> Result<Option<TreePosition>> {
        let node = self.validate(pos)?;
        Ok(self
            .storage
            .parent(node)
            .map(|parent| self.position(parent)))
    }

    // ============================================
    // Cell values
    // ============================================

    /// Value of cell `column` of `pos`.
    pub fn value(&self, pos: &TreePosition, column: usize) -> Result<&CellValue> {
        let node = self.validate(pos)?;
        self.check_column(column)?;
        self.storage
            .cell(node, column)
            .ok_or(Error::InvalidPosition(InvalidPositionKind::Removed))
    }

    /// Write cell `column` of `pos`.
    ///
    /// The value must match the declared column type; [`CellValue::Empty`]
    /// is accepted by every column.
    pub fn set_value(
        &mut self,
        pos: &TreePosition,
        column: usize,
        value: impl Into<CellValue>,
    ) -> Result<()> {
        let node = self.validate(pos)?;
        let expected = self.check_column(column)?;
        let value = value.into();
        if let Some(found) = value.column_type() {
            if found != expected {
                return Err(Error::TypeMismatch {
                    column,
                    expected,
                    found,
                });
            }
        }
        if !self.storage.set_cell(node, column, value) {
            return Err(Error::InvalidPosition(InvalidPositionKind::Removed));
        }

        if self.wants(TreeEvents::NODE_CHANGED) {
            let position = self.position(node);
            self.notify(&TreeStoreEvent::NodeChanged { position, column });
        }
        Ok(())
    }

    // ============================================
    // Structural mutation
    // ============================================

    /// Remove every node. All outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.version += 1;
        self.storage.clear();
        self.cache.clear();
        emit_log_with(LogLevel::Debug, || {
            format!("tree store {:?}: cleared (version {})", self.id, self.version)
        });
    }

    /// Insert a new node right before `pos`.
    pub fn insert_before(&mut self, pos: &TreePosition) -> Result<TreePosition> {
        let sibling = self.validate(pos)?;
        self.version += 1;
        let node = self
            .storage
            .insert_before(sibling)
            .ok_or(Error::InvalidPosition(InvalidPositionKind::Removed))?;
        Ok(self.inserted("insert_before", node))
    }

    /// Insert a new node right after `pos`.
    pub fn insert_after(&mut self, pos: &TreePosition) -> Result<TreePosition> {
        let sibling = self.validate(pos)?;
        self.version += 1;
        let node = self
            .storage
            .insert_after(sibling)
            .ok_or(Error::InvalidPosition(InvalidPositionKind::Removed))?;
        Ok(self.inserted("insert_after", node))
    }

    /// Append a new node as the last child of `pos` (top level for `None`).
    pub fn add_child(&mut self, pos: Option<&TreePosition>) -> Result<TreePosition> {
        let parent = pos.map(|pos| self.validate(pos)).transpose()?;
        self.version += 1;
        let node = self
            .storage
            .append_child(parent)
            .ok_or(Error::InvalidPosition(InvalidPositionKind::Removed))?;
        Ok(self.inserted("add_child", node))
    }

    /// Remove `pos` together with its subtree.
    ///
    /// Handles to any removed node are invalid afterwards.
    pub fn remove(&mut self, pos: &TreePosition) -> Result<()> {
        let node = self.validate(pos)?;
        let deleted = if self.wants(TreeEvents::NODE_DELETED) {
            let parent = self.storage.parent(node);
            self.storage.index_of(node).map(|index| (parent, index))
        } else {
            None
        };

        self.version += 1;
        let freed = self.storage.remove(node);
        for id in &freed {
            self.cache.remove(id);
        }
        emit_log_with(LogLevel::Debug, || {
            format!(
                "tree store {:?}: remove {:?} freed {} nodes (version {})",
                self.id,
                node,
                freed.len(),
                self.version
            )
        });

        if let Some((parent, index)) = deleted {
            let parent = parent.map(|parent| self.position(parent));
            self.notify(&TreeStoreEvent::NodeDeleted { parent, index });
        }
        Ok(())
    }

    // ============================================
    // Notifications
    // ============================================

    /// Install the listener receiving enabled [`TreeStoreEvent`]s.
    pub fn set_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&TreeStoreEvent) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn enable_event(&mut self, events: TreeEvents) {
        self.events.insert(events);
    }

    pub fn disable_event(&mut self, events: TreeEvents) {
        self.events.remove(events);
    }

    #[must_use]
    pub fn enabled_events(&self) -> TreeEvents {
        self.events
    }

    // ============================================
    // Diagnostics
    // ============================================

    /// Render the tree as an indented outline of first-column values.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        if let Some(first) = self.storage.first_child(None) {
            stack.push((first, 0));
        }
        while let Some((node, depth)) = stack.pop() {
            let label = self
                .storage
                .cell(node, 0)
                .map(ToString::to_string)
                .unwrap_or_default();
            let _ = writeln!(out, "{:indent$}- {label}", "", indent = depth * 2);
            if let Some(next) = self.storage.next_sibling(node) {
                stack.push((next, depth));
            }
            if let Some(child) = self.storage.first_child(Some(node)) {
                stack.push((child, depth + 1));
            }
        }
        out
    }

    // ============================================
    // Internals
    // ============================================

    fn position(&self, node: NodeId) -> TreePosition {
        TreePosition::new(self.id, node, self.version)
    }

    fn validate(&self, pos: &TreePosition) -> Result<NodeId> {
        if pos.store() != self.id {
            return Err(Error::InvalidPosition(InvalidPositionKind::ForeignStore));
        }
        if !self.storage.contains(pos.node()) {
            return Err(Error::InvalidPosition(InvalidPositionKind::Removed));
        }
        Ok(pos.node())
    }

    fn check_column(&self, column: usize) -> Result<ColumnType> {
        self.columns.get(column).copied().ok_or(Error::OutOfRange {
            column,
            columns: self.columns.len(),
        })
    }

    /// Cache record for `node`, reset if it predates `version`.
    fn record<'a>(
        cache: &'a mut HashMap<NodeId, ChildCache>,
        stats: &mut CacheStats,
        version: u64,
        node: NodeId,
    ) -> &'a mut ChildCache {
        let record = cache.entry(node).or_insert_with(|| ChildCache::new(version));
        if record.revalidate(version) {
            stats.invalidations += 1;
            emit_log_with(LogLevel::Trace, || {
                format!("tree store: dropped stale cache for {node:?} (version {version})")
            });
        }
        record
    }

    fn inserted(&mut self, op: &str, node: NodeId) -> TreePosition {
        emit_log_with(LogLevel::Debug, || {
            format!(
                "tree store {:?}: {op} -> {:?} (version {})",
                self.id, node, self.version
            )
        });
        let position = self.position(node);
        if self.wants(TreeEvents::NODE_INSERTED) {
            if let Some(index) = self.storage.index_of(node) {
                self.notify(&TreeStoreEvent::NodeInserted { position, index });
            }
        }
        position
    }

    fn wants(&self, kind: TreeEvents) -> bool {
        self.listener.is_some() && self.events.contains(kind)
    }

    fn notify(&mut self, event: &TreeStoreEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(event);
        }
    }
}

impl<S: TreeStorage + fmt::Debug> fmt::Debug for TreeStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeStore")
            .field("id", &self.id)
            .field("columns", &self.columns)
            .field("version", &self.version)
            .field("cached_records", &self.cache.len())
            .field("events", &self.events)
            .field("stats", &self.stats)
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}
