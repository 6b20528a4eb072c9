//! The frame chain.
//!
//! Frames live in an arena indexed by [`FrameId`]. The base frame sits at
//! index 0 and is never removed; every `begin` pushes a frame whose parent is
//! the frame directly below it. Reads walk the arena from the active (top)
//! frame down to the base.

use crate::frame::{Frame, Lookup};
use crate::snapshot::FrameSnapshot;
use crate::types::{FrameId, Value};

/// An ordered stack of overlay frames on top of a permanent base frame.
#[derive(Debug, Clone)]
pub struct FrameChain {
    /// Arena of frames; index 0 is the base, the last entry is active.
    frames: Vec<Frame>,
}

impl Default for FrameChain {
    fn default() -> Self {
        Self::new(Frame::new())
    }
}

impl FrameChain {
    /// Creates a chain holding only the given base frame.
    #[must_use]
    pub fn new(base: Frame) -> Self {
        Self { frames: vec![base] }
    }

    /// Returns the ID of the active frame.
    #[must_use]
    pub fn active(&self) -> FrameId {
        FrameId::new(self.frames.len() - 1)
    }

    /// Returns the number of open frames above the base.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    /// Returns the base frame.
    #[must_use]
    pub fn base(&self) -> &Frame {
        &self.frames[0]
    }

    /// Iterates over live frames from the active frame down to the base.
    pub fn iter(&self) -> impl Iterator<Item = (FrameId, &Frame)> {
        self.frames
            .iter()
            .enumerate()
            .rev()
            .map(|(index, frame)| (FrameId::new(index), frame))
    }

    /// Resolves the visible value of `key`.
    ///
    /// The closest frame with an opinion wins: a tombstone hides everything
    /// below it, a write answers immediately.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<Value> {
        for (_, frame) in self.iter() {
            match frame.lookup(key) {
                Lookup::Written(value) => return Some(value),
                Lookup::Deleted => return None,
                Lookup::Absent => {}
            }
        }
        None
    }

    /// Sums the count deltas for `value` across the whole chain.
    ///
    /// The sum is unclamped; callers that report counts floor it at zero.
    #[must_use]
    pub fn aggregate_count(&self, value: Value) -> i64 {
        self.frames.iter().map(|frame| frame.count_delta(value)).sum()
    }

    /// Captures every live frame, active frame first.
    #[must_use]
    pub fn snapshots(&self) -> Vec<FrameSnapshot> {
        self.iter()
            .map(|(id, frame)| FrameSnapshot::capture(id, frame))
            .collect()
    }

    /// Returns the active frame for mutation.
    pub(crate) fn active_mut(&mut self) -> &mut Frame {
        let index = self.frames.len() - 1;
        &mut self.frames[index]
    }

    /// Pushes an empty frame and makes it active.
    pub(crate) fn push(&mut self) -> FrameId {
        self.frames.push(Frame::new());
        self.active()
    }

    /// Removes the active frame without applying it.
    ///
    /// Returns `None` (and leaves the chain untouched) when only the base
    /// frame exists.
    pub(crate) fn pop(&mut self) -> Option<Frame> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Folds every frame above the base into the base, top to bottom.
    ///
    /// Returns the number of frames folded.
    pub(crate) fn flatten(&mut self, compact: bool) -> usize {
        let mut folded = 0;
        while let Some(parent_id) = self.active().parent() {
            let Some(child) = self.pop() else { break };
            let absolute = parent_id.is_base();
            let parent = &mut self.frames[parent_id.as_usize()];
            parent.absorb(child, absolute);
            if compact {
                parent.compact_counts(absolute);
            }
            folded += 1;
        }
        folded
    }
}
