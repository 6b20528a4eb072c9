//! Benchmark utilities.

#![warn(missing_docs)]

use nestkv_core::{Store, Value};
use rand::Rng;

/// Generate `count` distinct keys.
pub fn generate_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key{i}")).collect()
}

/// Generate `count` random values in `0..range`.
pub fn random_values(count: usize, range: Value) -> Vec<Value> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| rng.gen_range(0..range.max(1))).collect()
}

/// Build a store with `key_count` keys in the base and `depth` open frames,
/// each overwriting a slice of the keys.
pub fn layered_store(key_count: usize, depth: usize) -> Store {
    let keys = generate_keys(key_count);
    let values = random_values(key_count, 64);

    let mut store = Store::new();
    for (key, value) in keys.iter().zip(&values) {
        store.set(key.as_str(), *value);
    }
    for level in 0..depth {
        store.begin();
        let key = &keys[level % key_count.max(1)];
        store.set(key.as_str(), level as Value);
    }
    store
}
