//! Transaction frames.
//!
//! A frame is one level of overlay on top of the frame below it. It records
//! only what changed at its own level:
//!
//! - **writes**: keys set in this frame and their values
//! - **tombstones**: keys deleted in this frame, shadowing every older value
//! - **count deltas**: how many more (or fewer) keys hold a value because of
//!   this frame's operations, relative to what the frames below report
//!
//! A key is never both written and tombstoned in the same frame; whichever
//! operation happened last decides which set holds it.

use crate::types::Value;
use std::collections::{HashMap, HashSet};

/// The disposition of a key within a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The frame wrote this value.
    Written(Value),
    /// The frame deleted the key.
    Deleted,
    /// The frame says nothing about the key; ask the parent.
    Absent,
}

/// One level of transactional overlay.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Values written in this frame.
    writes: HashMap<String, Value>,
    /// Keys deleted in this frame.
    tombstones: HashSet<String>,
    /// Signed per-value deltas relative to the parent frame.
    local_count: HashMap<Value, i64>,
}

impl Frame {
    /// Creates an empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty frame with room for `capacity` writes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            writes: HashMap::with_capacity(capacity),
            tombstones: HashSet::new(),
            local_count: HashMap::new(),
        }
    }

    /// Returns this frame's disposition for `key`.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Lookup {
        if self.tombstones.contains(key) {
            return Lookup::Deleted;
        }
        match self.writes.get(key) {
            Some(&value) => Lookup::Written(value),
            None => Lookup::Absent,
        }
    }

    /// Returns this frame's count delta for `value` (zero when absent).
    #[must_use]
    pub fn count_delta(&self, value: Value) -> i64 {
        self.local_count.get(&value).copied().unwrap_or(0)
    }

    /// Returns the number of keys written in this frame.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    /// Returns the number of keys tombstoned in this frame.
    #[must_use]
    pub fn tombstone_count(&self) -> usize {
        self.tombstones.len()
    }

    /// Iterates over the writes recorded in this frame.
    pub fn writes(&self) -> impl Iterator<Item = (&str, Value)> {
        self.writes.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Iterates over the keys tombstoned in this frame.
    pub fn tombstones(&self) -> impl Iterator<Item = &str> {
        self.tombstones.iter().map(String::as_str)
    }

    /// Iterates over the count deltas recorded in this frame.
    pub fn count_deltas(&self) -> impl Iterator<Item = (Value, i64)> + '_ {
        self.local_count.iter().map(|(v, d)| (*v, *d))
    }

    /// Records a write, un-deleting the key within this frame.
    pub(crate) fn put(&mut self, key: String, value: Value) {
        self.tombstones.remove(&key);
        self.writes.insert(key, value);
    }

    /// Records a delete, dropping any local write for the key.
    ///
    /// With `absolute` set (the frame has no parent) no tombstone is kept:
    /// there is nothing below for it to shadow.
    pub(crate) fn mark_deleted(&mut self, key: String, absolute: bool) {
        self.writes.remove(&key);
        if !absolute {
            self.tombstones.insert(key);
        }
    }

    /// Adds `delta` to the count of `value`.
    pub(crate) fn adjust_count(&mut self, value: Value, delta: i64) {
        *self.local_count.entry(value).or_insert(0) += delta;
    }

    /// Folds `child` into this frame.
    ///
    /// Writes are copied first, then count deltas are added, then tombstones
    /// are applied. Tombstones must come after writes so that a key deleted in
    /// the child cannot survive through a stale write in this frame. With
    /// `absolute` set the child's tombstones only clear writes.
    pub(crate) fn absorb(&mut self, child: Frame, absolute: bool) {
        let Frame {
            writes,
            tombstones,
            local_count,
        } = child;

        for (key, value) in writes {
            self.tombstones.remove(&key);
            self.writes.insert(key, value);
        }

        for (value, delta) in local_count {
            self.adjust_count(value, delta);
        }

        for key in tombstones {
            self.mark_deleted(key, absolute);
        }
    }

    /// Drops count entries that carry no information.
    ///
    /// Zero deltas are always dropped. With `absolute` set (the frame has no
    /// parent, so its deltas are absolute counts) non-positive entries are
    /// dropped as well. Negative deltas in a frame with a parent must be kept:
    /// they still cancel counts recorded below.
    pub(crate) fn compact_counts(&mut self, absolute: bool) {
        if absolute {
            self.local_count.retain(|_, delta| *delta > 0);
        } else {
            self.local_count.retain(|_, delta| *delta != 0);
        }
    }
}
