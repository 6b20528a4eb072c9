//! Store configuration.

/// Configuration for creating a store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Initial capacity reserved for the base frame's write map.
    pub base_capacity: usize,

    /// Whether commit drops count entries that no longer carry information
    /// (zero deltas, and non-positive entries once folded into the base).
    pub compact_counts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_capacity: 0,
            compact_counts: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial capacity of the base frame.
    #[must_use]
    pub const fn base_capacity(mut self, capacity: usize) -> Self {
        self.base_capacity = capacity;
        self
    }

    /// Sets whether commit compacts count entries.
    #[must_use]
    pub const fn compact_counts(mut self, value: bool) -> Self {
        self.compact_counts = value;
        self
    }
}
