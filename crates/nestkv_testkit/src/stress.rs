//! Stress tests for NestKV.
//!
//! These drive the store through deep nesting and long operation runs and
//! check the count index against a full recount at the end.

use crate::fixtures::populated_store;
use nestkv_core::{Store, Value};
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Deepest nesting reached.
    pub max_depth: usize,
    /// Whether the final counts matched a full recount.
    pub consistent: bool,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(total_ops: usize, max_depth: usize, consistent: bool, duration: Duration) -> Self {
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total_ops as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops,
            max_depth,
            consistent,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Total operations: {}", self.total_ops);
        println!("Max depth: {}", self.max_depth);
        println!("Consistent: {}", self.consistent);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of operations to perform.
    pub operations: usize,
    /// Number of nested transactions to open.
    pub depth: usize,
    /// Number of distinct keys.
    pub key_count: usize,
    /// Number of distinct values.
    pub value_range: Value,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 10_000,
            depth: 256,
            key_count: 1_000,
            value_range: 16,
        }
    }
}

impl StressConfig {
    /// Creates a small configuration suitable for unit tests.
    #[must_use]
    pub fn small() -> Self {
        Self {
            operations: 500,
            depth: 32,
            key_count: 64,
            value_range: 4,
        }
    }
}

/// Checks every value's count against a recount of the keys `k0..`.
pub fn counts_consistent(store: &Store, key_count: usize, value_range: Value) -> bool {
    let mut expected = vec![0u64; value_range.max(1) as usize];
    for i in 0..key_count {
        if let Ok(value) = store.get(&format!("k{i}")) {
            if let Some(slot) = usize::try_from(value).ok().and_then(|v| expected.get_mut(v)) {
                *slot += 1;
            }
        }
    }
    expected
        .iter()
        .enumerate()
        .all(|(value, count)| store.count(value as Value) == *count)
}

/// Opens `depth` frames, writing and deleting in each, then commits once.
pub fn stress_deep_commit(config: &StressConfig) -> StressTestResult {
    let mut store = populated_store(config.key_count, config.value_range);
    let per_frame = (config.operations / config.depth.max(1)).max(1);

    let start = Instant::now();
    let mut ops = 0usize;

    for level in 0..config.depth {
        store.begin();
        ops += 1;
        for i in 0..per_frame {
            let key = format!("k{}", (level * per_frame + i) % config.key_count.max(1));
            if i % 4 == 0 {
                store.delete(&key);
            } else {
                store.set(key, (level + i) as Value % config.value_range.max(1));
            }
            ops += 1;
        }
    }
    store.commit();
    ops += 1;

    let consistent = store.depth() == 0
        && counts_consistent(&store, config.key_count, config.value_range);
    StressTestResult::new(ops, config.depth, consistent, start.elapsed())
}

/// Repeatedly opens and rolls back frames; the base must be unchanged.
pub fn stress_rollback_churn(config: &StressConfig) -> StressTestResult {
    let mut store = populated_store(config.key_count, config.value_range);
    let before: Vec<u64> = (0..config.value_range).map(|v| store.count(v)).collect();

    let start = Instant::now();
    let mut ops = 0usize;
    let mut max_depth = 0usize;

    for i in 0..config.operations {
        let key = format!("k{}", i % config.key_count.max(1));
        match i % 5 {
            0 => {
                store.begin();
                max_depth = max_depth.max(store.depth());
            }
            1 | 2 => {
                store.set(key, i as Value % config.value_range.max(1));
            }
            3 => {
                store.delete(&key);
            }
            _ => {
                if store.depth() > config.depth {
                    let _ = store.rollback();
                }
            }
        }
        ops += 1;
    }
    while store.rollback().is_ok() {
        ops += 1;
    }

    let after: Vec<u64> = (0..config.value_range).map(|v| store.count(v)).collect();
    let consistent = before == after
        && counts_consistent(&store, config.key_count, config.value_range);
    StressTestResult::new(ops, max_depth, consistent, start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_commit_is_consistent() {
        let result = stress_deep_commit(&StressConfig::small());
        assert!(result.consistent);
        assert_eq!(result.max_depth, 32);
    }

    #[test]
    fn rollback_churn_restores_base() {
        let result = stress_rollback_churn(&StressConfig::small());
        assert!(result.consistent);
        assert!(result.max_depth > 0);
    }
}
