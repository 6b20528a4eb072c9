//! Point-in-time views of frames for inspection and debugging.

use crate::frame::Frame;
use crate::types::{FrameId, Value};
use std::collections::{BTreeMap, BTreeSet};

/// An owned, ordered copy of one frame's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FrameSnapshot {
    /// The frame's position in the chain.
    pub id: FrameId,
    /// Keys written in the frame.
    pub writes: BTreeMap<String, Value>,
    /// Keys deleted in the frame.
    pub tombstones: BTreeSet<String>,
    /// Count deltas recorded in the frame.
    pub count_deltas: BTreeMap<Value, i64>,
}

impl FrameSnapshot {
    /// Copies the contents of `frame`.
    #[must_use]
    pub fn capture(id: FrameId, frame: &Frame) -> Self {
        Self {
            id,
            writes: frame
                .writes()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
            tombstones: frame.tombstones().map(str::to_string).collect(),
            count_deltas: frame.count_deltas().collect(),
        }
    }
}
