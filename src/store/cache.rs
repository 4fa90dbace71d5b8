//! Per-node lookup cache and its statistics.

use crate::storage::NodeId;

/// Cached lookups for one parent node.
///
/// Only trusted while `stamp` equals the store version; see
/// [`ChildCache::revalidate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ChildCache {
    /// Store version at which this record was last validated.
    pub stamp: u64,
    /// Index and node of the child resolved most recently.
    pub last_child: Option<(usize, NodeId)>,
    /// Number of direct children.
    pub child_count: Option<usize>,
}

impl ChildCache {
    pub const fn new(stamp: u64) -> Self {
        Self {
            stamp,
            last_child: None,
            child_count: None,
        }
    }

    /// Drop cached data if the record predates `version`.
    ///
    /// Returns `true` if anything cached was discarded.
    pub fn revalidate(&mut self, version: u64) -> bool {
        if self.stamp == version {
            return false;
        }
        let had_data = self.last_child.is_some() || self.child_count.is_some();
        *self = Self::new(version);
        had_data
    }
}

/// Counters describing how child lookups were resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered straight from a cached index or count.
    pub hits: u64,
    /// Lookups that walked forward from a cached child.
    pub forward_walks: u64,
    /// Sibling steps taken by forward walks.
    pub forward_steps: u64,
    /// Lookups sent to the storage's nth-child query.
    pub direct_lookups: u64,
    /// Records discarded because the store version moved on.
    pub invalidations: u64,
}

impl CacheStats {
    /// Total child lookups that went through the cache logic.
    #[must_use]
    pub const fn lookups(&self) -> u64 {
        self.hits + self.forward_walks + self.direct_lookups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revalidate_same_version_keeps_data() {
        let mut record = ChildCache::new(4);
        record.child_count = Some(2);
        assert!(!record.revalidate(4));
        assert_eq!(record.child_count, Some(2));
    }

    #[test]
    fn test_revalidate_new_version_resets() {
        let mut record = ChildCache::new(4);
        record.last_child = Some((1, NodeId::new(0, 0)));
        record.child_count = Some(2);

        assert!(record.revalidate(5));
        assert_eq!(record, ChildCache::new(5));
    }

    #[test]
    fn test_revalidate_empty_record_reports_nothing_dropped() {
        let mut record = ChildCache::new(1);
        assert!(!record.revalidate(2));
        assert_eq!(record.stamp, 2);
    }

    #[test]
    fn test_stats_lookups() {
        let stats = CacheStats {
            hits: 2,
            forward_walks: 3,
            forward_steps: 10,
            direct_lookups: 1,
            invalidations: 0,
        };
        assert_eq!(stats.lookups(), 6);
    }
}
