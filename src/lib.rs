//! `treestore` - hierarchical data store backend for GUI tree views
//!
//! Binds a toolkit-neutral tree-model contract to an arena-backed ordered
//! tree. Clients navigate with opaque [`TreePosition`] handles; the store
//! stamps them with a structural version and caches sequential child
//! lookups so list-style scans stay cheap under mutation.

// Crate-level lint configuration
#![allow(clippy::cast_possible_truncation)] // Slot indices are bounded by u32 at alloc
#![allow(clippy::module_name_repetitions)] // Allow TreeStore::TreeStoreOptions etc
#![allow(clippy::missing_errors_doc)] // Error variants are documented on Error
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_possible_wrap)] // Test fixtures cast small indices to i64

pub mod error;
pub mod event;
pub mod storage;
pub mod store;
pub mod value;

// Re-export core types at crate root
pub use error::{Error, InvalidPositionKind, Result};
pub use event::{LogLevel, clear_log_callback, emit_log, set_log_callback};
pub use storage::{NodeArena, NodeId, TreeStorage};
pub use store::{
    CacheStats, StoreId, TreeEvents, TreePosition, TreeStore, TreeStoreEvent, TreeStoreOptions,
};
pub use value::{CellValue, ColumnType};
