//! Store statistics.
//!
//! Counters for every operation a session performs. The store is owned by a
//! single caller, so the counters are plain integers updated through
//! `&mut self`; [`Store::stats`](crate::Store::stats) hands out a copy.
//!
//! # Usage
//!
//! ```rust
//! use nestkv_core::Store;
//!
//! let mut store = Store::new();
//! store.set("a", 1);
//! store.begin();
//! let _ = store.rollback();
//!
//! let stats = store.stats();
//! assert_eq!(stats.sets, 1);
//! assert_eq!(stats.rollbacks, 1);
//! ```

/// Operation counters for one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StoreStats {
    // Read path
    /// Total number of get operations.
    pub gets: u64,
    /// Get operations that found no visible value.
    pub get_misses: u64,
    /// Total number of count queries.
    pub counts: u64,

    // Write path
    /// Total number of set operations.
    pub sets: u64,
    /// Total number of delete operations.
    pub deletes: u64,
    /// Delete operations on keys with no visible value.
    pub delete_misses: u64,

    // Transaction control
    /// Total number of frames opened by begin.
    pub begins: u64,
    /// Commits that folded at least one frame.
    pub commits: u64,
    /// Commits issued with no open transaction.
    pub empty_commits: u64,
    /// Frames discarded by rollback.
    pub rollbacks: u64,
    /// Rollbacks rejected because no transaction was open.
    pub rejected_rollbacks: u64,
    /// Total number of frames folded by commits.
    pub frames_folded: u64,
    /// Deepest nesting reached.
    pub max_depth: u64,
}

impl StoreStats {
    /// Creates zeroed stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_get(&mut self, hit: bool) {
        self.gets += 1;
        if !hit {
            self.get_misses += 1;
        }
    }

    pub(crate) fn record_count(&mut self) {
        self.counts += 1;
    }

    pub(crate) fn record_set(&mut self) {
        self.sets += 1;
    }

    pub(crate) fn record_delete(&mut self, hit: bool) {
        self.deletes += 1;
        if !hit {
            self.delete_misses += 1;
        }
    }

    pub(crate) fn record_begin(&mut self, depth: usize) {
        self.begins += 1;
        self.max_depth = self.max_depth.max(depth as u64);
    }

    pub(crate) fn record_commit(&mut self, folded: usize) {
        if folded == 0 {
            self.empty_commits += 1;
        } else {
            self.commits += 1;
            self.frames_folded += folded as u64;
        }
    }

    pub(crate) fn record_rollback(&mut self, accepted: bool) {
        if accepted {
            self.rollbacks += 1;
        } else {
            self.rejected_rollbacks += 1;
        }
    }

    /// Returns the total number of operations recorded.
    #[must_use]
    pub fn total_operations(&self) -> u64 {
        self.gets
            + self.counts
            + self.sets
            + self.deletes
            + self.begins
            + self.commits
            + self.empty_commits
            + self.rollbacks
            + self.rejected_rollbacks
    }
}
