//! The store facade.
//!
//! [`Store`] is the session object a caller owns. It wraps a [`FrameChain`]
//! and exposes the typed operations of the store:
//!
//! - reads: [`get`](Store::get), [`count`](Store::count)
//! - writes: [`set`](Store::set), [`delete`](Store::delete)
//! - transaction control: [`begin`](Store::begin), [`commit`](Store::commit),
//!   [`rollback`](Store::rollback)
//!
//! Writes only ever touch the active frame. Each write keeps the active
//! frame's count deltas consistent at write time, so `count` is a sum over
//! the chain and `commit` never rescans keys.

use crate::chain::FrameChain;
use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::frame::Frame;
use crate::snapshot::FrameSnapshot;
use crate::stats::StoreStats;
use crate::types::{FrameId, Value};
use std::cell::Cell;
use tracing::{debug, trace};

/// An in-memory key/value store with nested transactions.
///
/// # Example
///
/// ```rust
/// use nestkv_core::Store;
///
/// let mut store = Store::new();
/// store.set("a", 10);
///
/// store.begin();
/// store.set("a", 20);
/// assert_eq!(store.get("a").unwrap(), 20);
/// assert_eq!(store.count(10), 0);
///
/// store.rollback().unwrap();
/// assert_eq!(store.get("a").unwrap(), 10);
/// assert_eq!(store.count(10), 1);
/// ```
#[derive(Debug)]
pub struct Store {
    /// Configuration.
    config: Config,
    /// Overlay frames, base first.
    chain: FrameChain,
    /// Operation counters.
    stats: Cell<StoreStats>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty store with a custom configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let base = Frame::with_capacity(config.base_capacity);
        Self {
            config,
            chain: FrameChain::new(base),
            stats: Cell::new(StoreStats::new()),
        }
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a copy of the operation counters.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        self.stats.get()
    }

    /// Returns the underlying frame chain.
    #[must_use]
    pub fn chain(&self) -> &FrameChain {
        &self.chain
    }

    /// Returns the ID of the active frame.
    #[must_use]
    pub fn active(&self) -> FrameId {
        self.chain.active()
    }

    /// Returns the number of open transactions.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.chain.depth()
    }

    /// Returns true if at least one transaction is open.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.chain.depth() > 0
    }

    /// Captures every live frame, active frame first.
    #[must_use]
    pub fn frames(&self) -> Vec<FrameSnapshot> {
        self.chain.snapshots()
    }

    /// Returns the visible value of `key`.
    ///
    /// # Errors
    ///
    /// Returns `KeyNotFound` if the key was never set, or if the closest
    /// frame with an opinion about it deleted it.
    pub fn get(&self, key: &str) -> CoreResult<Value> {
        let resolved = self.chain.resolve(key);
        trace!(key, value = ?resolved, frame = %self.active(), "get");
        self.record(|stats| stats.record_get(resolved.is_some()));
        resolved.ok_or_else(|| CoreError::key_not_found(key))
    }

    /// Returns how many keys currently hold `value`.
    ///
    /// This sums the count deltas of every frame from the active frame down
    /// to the base, so the cost is proportional to the nesting depth, not to
    /// the number of keys. The sum is floored at zero.
    #[must_use]
    pub fn count(&self, value: Value) -> u64 {
        let total = self.chain.aggregate_count(value);
        trace!(value, total, frame = %self.active(), "count");
        self.record(StoreStats::record_count);
        u64::try_from(total).unwrap_or(0)
    }

    /// Sets `key` to `value` in the active frame.
    ///
    /// Returns the value that was visible before the write, if any. Setting
    /// never fails and overwrites whatever the chain held.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        // Resolved before the write so a tombstone in the active frame
        // reads as "absent" and is not charged twice.
        let previous = self.chain.resolve(&key);
        let active = self.chain.active();
        debug!(key = %key, value, ?previous, frame = %active, "set");

        let frame = self.chain.active_mut();
        if let Some(old) = previous {
            frame.adjust_count(old, -1);
        }
        frame.adjust_count(value, 1);
        frame.put(key, value);

        self.record(StoreStats::record_set);
        previous
    }

    /// Deletes `key` in the active frame.
    ///
    /// Returns the value that was removed. Deleting a key with no visible
    /// value is a no-op and returns `None`.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        let active = self.chain.active();
        let Some(value) = self.chain.resolve(key) else {
            debug!(key, frame = %active, "delete of missing key ignored");
            self.record(|stats| stats.record_delete(false));
            return None;
        };
        debug!(key, value, frame = %active, "delete");

        let frame = self.chain.active_mut();
        frame.mark_deleted(key.to_string(), active.is_base());
        frame.adjust_count(value, -1);

        self.record(|stats| stats.record_delete(true));
        Some(value)
    }

    /// Opens a nested transaction and returns the new active frame.
    pub fn begin(&mut self) -> FrameId {
        let active = self.chain.push();
        debug!(frame = %active, depth = self.depth(), "begin");
        self.record(|stats| stats.record_begin(active.as_usize()));
        active
    }

    /// Commits every open transaction into the base frame.
    ///
    /// Commit always flattens the whole chain, not just the innermost
    /// transaction. With no open transaction this is a no-op. Returns the new
    /// active frame, which is always the base.
    pub fn commit(&mut self) -> FrameId {
        let depth = self.depth();
        let folded = self.chain.flatten(self.config.compact_counts);
        if folded == 0 {
            debug!("commit with no open transaction");
        } else {
            debug!(depth, folded, "commit");
        }
        self.record(|stats| stats.record_commit(folded));
        self.chain.active()
    }

    /// Discards the innermost transaction and returns the new active frame.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveTransaction` if no transaction is open; the store is
    /// left unchanged.
    pub fn rollback(&mut self) -> CoreResult<FrameId> {
        let discarded = self.chain.active();
        match self.chain.pop() {
            Some(frame) => {
                debug!(
                    frame = %discarded,
                    writes = frame.write_count(),
                    tombstones = frame.tombstone_count(),
                    "rollback"
                );
                self.record(|stats| stats.record_rollback(true));
                Ok(self.chain.active())
            }
            None => {
                debug!("rollback with no open transaction");
                self.record(|stats| stats.record_rollback(false));
                Err(CoreError::NoActiveTransaction)
            }
        }
    }

    fn record(&self, update: impl FnOnce(&mut StoreStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_not_found() {
        let store = Store::new();
        let err = store.get("nope").unwrap_err();
        assert_eq!(err, CoreError::key_not_found("nope"));
    }

    #[test]
    fn set_returns_previous_value() {
        let mut store = Store::new();
        assert_eq!(store.set("a", 1), None);
        assert_eq!(store.set("a", 2), Some(1));
        assert_eq!(store.count(1), 0);
        assert_eq!(store.count(2), 1);
    }

    #[test]
    fn delete_returns_removed_value() {
        let mut store = Store::new();
        store.set("a", 4);
        assert_eq!(store.delete("a"), Some(4));
        assert_eq!(store.delete("a"), None);
        assert_eq!(store.count(4), 0);
    }

    #[test]
    fn set_after_delete_in_same_frame_is_not_charged_twice() {
        let mut store = Store::new();
        store.set("a", 1);
        store.begin();
        store.delete("a");
        assert_eq!(store.set("a", 2), None);

        assert_eq!(store.get("a").unwrap(), 2);
        assert_eq!(store.count(1), 0);
        assert_eq!(store.count(2), 1);

        store.commit();
        assert_eq!(store.count(1), 0);
        assert_eq!(store.count(2), 1);
    }

    #[test]
    fn delete_after_set_in_same_frame_charges_visible_value() {
        let mut store = Store::new();
        store.set("a", 1);
        store.begin();
        store.set("a", 2);
        assert_eq!(store.delete("a"), Some(2));

        assert!(store.get("a").is_err());
        assert_eq!(store.count(1), 0);
        assert_eq!(store.count(2), 0);

        store.rollback().unwrap();
        assert_eq!(store.get("a").unwrap(), 1);
        assert_eq!(store.count(1), 1);
    }

    #[test]
    fn begin_and_rollback_return_active_frame() {
        let mut store = Store::new();
        assert_eq!(store.begin(), FrameId::new(1));
        assert_eq!(store.begin(), FrameId::new(2));
        assert_eq!(store.rollback().unwrap(), FrameId::new(1));
        assert_eq!(store.rollback().unwrap(), FrameId::BASE);
        assert!(!store.in_transaction());
    }

    #[test]
    fn rollback_at_base_fails_and_changes_nothing() {
        let mut store = Store::new();
        store.set("a", 1);

        assert_eq!(store.rollback(), Err(CoreError::NoActiveTransaction));
        assert_eq!(store.get("a").unwrap(), 1);
        assert_eq!(store.depth(), 0);
    }

    #[test]
    fn commit_at_base_is_noop() {
        let mut store = Store::new();
        store.set("a", 1);

        assert_eq!(store.commit(), FrameId::BASE);
        assert_eq!(store.get("a").unwrap(), 1);
        assert_eq!(store.stats().empty_commits, 1);
    }

    #[test]
    fn commit_flattens_every_level() {
        let mut store = Store::new();
        store.begin();
        store.set("a", 1);
        store.begin();
        store.set("b", 1);

        assert_eq!(store.commit(), FrameId::BASE);
        assert_eq!(store.depth(), 0);
        assert_eq!(store.get("a").unwrap(), 1);
        assert_eq!(store.get("b").unwrap(), 1);
        assert_eq!(store.count(1), 2);
        assert!(store.rollback().is_err());
    }

    #[test]
    fn nested_delete_survives_commit() {
        let mut store = Store::new();
        store.set("a", 5);
        store.begin();
        store.begin();
        store.delete("a");
        store.commit();

        assert!(store.get("a").is_err());
        assert_eq!(store.count(5), 0);
    }

    #[test]
    fn base_keeps_no_tombstones() {
        let mut store = Store::new();
        for i in 0..100 {
            let key = format!("base{i}");
            store.set(key.as_str(), 1);
            store.delete(&key);
        }
        assert_eq!(store.chain().base().tombstone_count(), 0);

        store.begin();
        for i in 0..100 {
            let key = format!("nested{i}");
            store.set(key.as_str(), 1);
            store.delete(&key);
        }
        store.begin();
        store.set("kept", 1);
        store.commit();

        let base = store.chain().base();
        assert_eq!(base.tombstone_count(), 0);
        assert_eq!(base.write_count(), 1);
        assert_eq!(store.count(1), 1);
        assert!(store.get("base0").is_err());
        assert!(store.get("nested0").is_err());
    }

    #[test]
    fn commit_without_compaction_is_equivalent() {
        let mut store = Store::with_config(Config::new().compact_counts(false));
        store.set("a", 5);
        store.begin();
        store.delete("a");
        store.set("b", 5);
        store.commit();

        assert_eq!(store.count(5), 1);
        assert!(store.get("a").is_err());
        assert_eq!(store.get("b").unwrap(), 5);
    }

    #[test]
    fn count_is_floored_at_zero() {
        let mut store = Store::new();
        store.chain.active_mut().adjust_count(3, -2);
        assert_eq!(store.count(3), 0);
    }

    #[test]
    fn frames_report_active_first() {
        let mut store = Store::new();
        store.set("a", 1);
        store.begin();
        store.delete("a");

        let frames = store.frames();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].tombstones.contains("a"));
        assert_eq!(frames[1].writes.get("a"), Some(&1));
    }

    #[test]
    fn stats_track_operations() {
        let mut store = Store::new();
        store.set("a", 1);
        let _ = store.get("a");
        let _ = store.get("b");
        store.delete("b");
        store.begin();
        store.begin();
        store.commit();
        let _ = store.rollback();

        let stats = store.stats();
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.gets, 2);
        assert_eq!(stats.get_misses, 1);
        assert_eq!(stats.delete_misses, 1);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.frames_folded, 2);
        assert_eq!(stats.rejected_rollbacks, 1);
    }
}
