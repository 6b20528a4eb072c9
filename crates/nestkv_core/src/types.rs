//! Core type definitions for NestKV.

use std::fmt;

/// Value type stored under every key.
pub type Value = i64;

/// Index of a frame in the store's frame arena.
///
/// Frame IDs double as nesting depth: the base frame is always `FrameId(0)`
/// and the frame opened by the n-th nested `begin` is `FrameId(n)`. The
/// parent of any non-base frame is the ID one below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FrameId(pub usize);

impl FrameId {
    /// The base (non-transactional) frame.
    pub const BASE: Self = Self(0);

    /// Creates a new frame ID.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }

    /// Returns true if this is the base frame.
    #[must_use]
    pub const fn is_base(self) -> bool {
        self.0 == 0
    }

    /// Returns the parent frame, or `None` for the base frame.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self.0 {
            0 => None,
            n => Some(Self(n - 1)),
        }
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_base() {
            write!(f, "frame:base")
        } else {
            write!(f, "frame:{}", self.0)
        }
    }
}
