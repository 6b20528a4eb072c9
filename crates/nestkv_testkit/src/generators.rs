//! Property-based test generators using proptest.
//!
//! Keys and values are drawn from small domains on purpose: collisions are
//! what exercise shadowing, tombstones and the count index.

use nestkv_core::Value;
use proptest::prelude::*;

/// One operation against a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Set a key
    Set {
        /// Key
        key: String,
        /// Value
        value: Value,
    },
    /// Read a key
    Get {
        /// Key
        key: String,
    },
    /// Delete a key
    Delete {
        /// Key
        key: String,
    },
    /// Count keys holding a value
    Count {
        /// Value
        value: Value,
    },
    /// Open a transaction
    Begin,
    /// Commit every open transaction
    Commit,
    /// Discard the innermost transaction
    Rollback,
}

/// Strategy for generating keys from a small alphabet.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-e]").expect("Invalid regex")
}

/// Strategy for generating values from a small range.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    -2i64..6
}

/// Strategy for generating single operations.
pub fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        5 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| Operation::Set { key, value }),
        2 => key_strategy().prop_map(|key| Operation::Get { key }),
        3 => key_strategy().prop_map(|key| Operation::Delete { key }),
        2 => value_strategy().prop_map(|value| Operation::Count { value }),
        2 => Just(Operation::Begin),
        1 => Just(Operation::Commit),
        1 => Just(Operation::Rollback),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(operation_strategy(), min_ops..max_ops)
}

/// Strategy for delete-heavy sequences that open many nested frames.
pub fn nested_delete_sequence_strategy(max_ops: usize) -> impl Strategy<Value = Vec<Operation>> {
    let op = prop_oneof![
        2 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| Operation::Set { key, value }),
        4 => key_strategy().prop_map(|key| Operation::Delete { key }),
        3 => Just(Operation::Begin),
        1 => Just(Operation::Commit),
        1 => Just(Operation::Rollback),
    ];
    prop::collection::vec(op, 1..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
