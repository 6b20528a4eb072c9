//! Eager-copy reference model.
//!
//! Every `begin` clones the whole visible map, so each level is a complete,
//! self-contained view. It costs O(keys) per `begin` and per `count`, but its
//! behaviour is obvious by inspection, which makes it a good oracle for the
//! overlay store.

use nestkv_core::{CoreError, CoreResult, Value};
use std::collections::HashMap;

/// A store that copies the full state on every `begin`.
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    /// Complete views, base first; the last one is active.
    levels: Vec<HashMap<String, Value>>,
}

impl Default for ReferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceStore {
    /// Creates an empty reference store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            levels: vec![HashMap::new()],
        }
    }

    fn top(&self) -> &HashMap<String, Value> {
        &self.levels[self.levels.len() - 1]
    }

    fn top_mut(&mut self) -> &mut HashMap<String, Value> {
        let index = self.levels.len() - 1;
        &mut self.levels[index]
    }

    /// Returns the number of open transactions.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Returns the visible value of `key`.
    pub fn get(&self, key: &str) -> CoreResult<Value> {
        self.top()
            .get(key)
            .copied()
            .ok_or_else(|| CoreError::key_not_found(key))
    }

    /// Sets `key`, returning the previous visible value.
    pub fn set(&mut self, key: &str, value: Value) -> Option<Value> {
        self.top_mut().insert(key.to_string(), value)
    }

    /// Deletes `key`, returning the removed value.
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.top_mut().remove(key)
    }

    /// Counts keys holding `value` by scanning the visible map.
    #[must_use]
    pub fn count(&self, value: Value) -> u64 {
        self.top().values().filter(|v| **v == value).count() as u64
    }

    /// Opens a transaction by copying the visible map.
    pub fn begin(&mut self) -> usize {
        let copy = self.top().clone();
        self.levels.push(copy);
        self.depth()
    }

    /// Keeps only the active view as the new base.
    pub fn commit(&mut self) -> usize {
        if self.levels.len() > 1 {
            let top = self.levels.pop().unwrap_or_default();
            self.levels.clear();
            self.levels.push(top);
        }
        self.depth()
    }

    /// Discards the active view.
    pub fn rollback(&mut self) -> CoreResult<usize> {
        if self.levels.len() > 1 {
            self.levels.pop();
            Ok(self.depth())
        } else {
            Err(CoreError::NoActiveTransaction)
        }
    }

    /// Returns a sorted copy of the visible map.
    #[must_use]
    pub fn visible(&self) -> Vec<(String, Value)> {
        let mut entries: Vec<_> = self.top().iter().map(|(k, v)| (k.clone(), *v)).collect();
        entries.sort();
        entries
    }
}
