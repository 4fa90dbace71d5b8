//! Change notifications.

use super::TreePosition;
use bitflags::bitflags;

bitflags! {
    /// Notification kinds a store can deliver to its listener.
    ///
    /// Every kind starts disabled; computing child indices for the payload
    /// costs a sibling walk, so hosts opt in to what they render.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct TreeEvents: u8 {
        /// A node was inserted or appended.
        const NODE_INSERTED = 0x01;
        /// A node (with its subtree) was removed.
        const NODE_DELETED  = 0x02;
        /// A cell value changed.
        const NODE_CHANGED  = 0x04;
    }
}

/// A change delivered to the store listener.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeStoreEvent {
    /// `position` now sits at `index` among its siblings.
    NodeInserted { position: TreePosition, index: usize },
    /// The child at `index` of `parent` (`None` for top level) was removed.
    NodeDeleted {
        parent: Option<TreePosition>,
        index: usize,
    },
    /// Cell `column` of `position` was written.
    NodeChanged { position: TreePosition, column: usize },
}

impl TreeStoreEvent {
    /// Flag that gates this event.
    #[must_use]
    pub const fn kind(&self) -> TreeEvents {
        match self {
            Self::NodeInserted { .. } => TreeEvents::NODE_INSERTED,
            Self::NodeDeleted { .. } => TreeEvents::NODE_DELETED,
            Self::NodeChanged { .. } => TreeEvents::NODE_CHANGED,
        }
    }
}

pub(crate) type Listener = Box<dyn FnMut(&TreeStoreEvent) + Send + 'static>;
