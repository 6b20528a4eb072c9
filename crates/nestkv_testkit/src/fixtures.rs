//! Test fixtures and store helpers.
//!
//! [`Session`] abstracts over the overlay [`Store`] and the eager-copy
//! [`ReferenceStore`] so the same operation sequence can be replayed against
//! both and the outcomes compared.

use crate::generators::Operation;
use crate::model::ReferenceStore;
use nestkv_core::{CoreError, Store, Value};

/// The typed operations shared by every store implementation.
pub trait Session {
    /// Returns the visible value of `key`.
    fn get(&self, key: &str) -> Result<Value, CoreError>;
    /// Sets `key`, returning the previous visible value.
    fn set(&mut self, key: &str, value: Value) -> Option<Value>;
    /// Deletes `key`, returning the removed value.
    fn delete(&mut self, key: &str) -> Option<Value>;
    /// Counts keys holding `value`.
    fn count(&self, value: Value) -> u64;
    /// Opens a transaction, returning the new depth.
    fn begin(&mut self) -> usize;
    /// Commits every open transaction, returning the new depth.
    fn commit(&mut self) -> usize;
    /// Discards the innermost transaction, returning the new depth.
    fn rollback(&mut self) -> Result<usize, CoreError>;
    /// Returns the number of open transactions.
    fn depth(&self) -> usize;
}

impl Session for Store {
    fn get(&self, key: &str) -> Result<Value, CoreError> {
        Store::get(self, key)
    }

    fn set(&mut self, key: &str, value: Value) -> Option<Value> {
        Store::set(self, key, value)
    }

    fn delete(&mut self, key: &str) -> Option<Value> {
        Store::delete(self, key)
    }

    fn count(&self, value: Value) -> u64 {
        Store::count(self, value)
    }

    fn begin(&mut self) -> usize {
        Store::begin(self).as_usize()
    }

    fn commit(&mut self) -> usize {
        Store::commit(self).as_usize()
    }

    fn rollback(&mut self) -> Result<usize, CoreError> {
        Store::rollback(self).map(|id| id.as_usize())
    }

    fn depth(&self) -> usize {
        Store::depth(self)
    }
}

impl Session for ReferenceStore {
    fn get(&self, key: &str) -> Result<Value, CoreError> {
        ReferenceStore::get(self, key)
    }

    fn set(&mut self, key: &str, value: Value) -> Option<Value> {
        ReferenceStore::set(self, key, value)
    }

    fn delete(&mut self, key: &str) -> Option<Value> {
        ReferenceStore::delete(self, key)
    }

    fn count(&self, value: Value) -> u64 {
        ReferenceStore::count(self, value)
    }

    fn begin(&mut self) -> usize {
        ReferenceStore::begin(self)
    }

    fn commit(&mut self) -> usize {
        ReferenceStore::commit(self)
    }

    fn rollback(&mut self) -> Result<usize, CoreError> {
        ReferenceStore::rollback(self)
    }

    fn depth(&self) -> usize {
        ReferenceStore::depth(self)
    }
}

/// The observable result of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Result of a read.
    Read(Result<Value, CoreError>),
    /// Previous value returned by a set or delete.
    Previous(Option<Value>),
    /// Result of a count.
    Count(u64),
    /// New depth after a transaction-control operation.
    Depth(Result<usize, CoreError>),
}

/// Applies one operation to a session.
pub fn apply<S: Session + ?Sized>(session: &mut S, op: &Operation) -> Outcome {
    match op {
        Operation::Set { key, value } => Outcome::Previous(session.set(key, *value)),
        Operation::Get { key } => Outcome::Read(session.get(key)),
        Operation::Delete { key } => Outcome::Previous(session.delete(key)),
        Operation::Count { value } => Outcome::Count(session.count(*value)),
        Operation::Begin => Outcome::Depth(Ok(session.begin())),
        Operation::Commit => Outcome::Depth(Ok(session.commit())),
        Operation::Rollback => Outcome::Depth(session.rollback()),
    }
}

/// Applies a sequence of operations, collecting every outcome.
pub fn run_operations<S: Session + ?Sized>(session: &mut S, ops: &[Operation]) -> Vec<Outcome> {
    ops.iter().map(|op| apply(session, op)).collect()
}

/// Replays `ops` against a fresh [`Store`] and a fresh [`ReferenceStore`].
///
/// Returns the index of the first operation whose outcomes differ, with
/// both outcomes.
pub fn first_divergence(ops: &[Operation]) -> Option<(usize, Outcome, Outcome)> {
    let mut store = Store::new();
    let mut model = ReferenceStore::new();

    for (index, op) in ops.iter().enumerate() {
        let actual = apply(&mut store, op);
        let expected = apply(&mut model, op);
        if actual != expected {
            return Some((index, actual, expected));
        }
    }
    None
}

/// Returns a store whose base frame holds `key_count` keys `k0..` with
/// values `0..value_range` assigned round-robin.
pub fn populated_store(key_count: usize, value_range: Value) -> Store {
    let mut store = Store::new();
    for i in 0..key_count {
        store.set(format!("k{i}"), i as Value % value_range.max(1));
    }
    store
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Opens `depth` transactions, writing `key = level` in each.
    pub fn nested_writes(store: &mut Store, key: &str, depth: usize) {
        for level in 1..=depth {
            store.begin();
            store.set(key, level as Value);
        }
    }

    /// Opens `depth` transactions, deleting one base key in each.
    ///
    /// Requires at least `depth` keys named `k0..` in the base.
    pub fn nested_deletes(store: &mut Store, depth: usize) {
        for level in 0..depth {
            store.begin();
            store.delete(&format!("k{level}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populated_store_assigns_round_robin_values() {
        let store = populated_store(10, 3);
        assert_eq!(store.count(0), 4);
        assert_eq!(store.count(1), 3);
        assert_eq!(store.count(2), 3);
        assert_eq!(store.get("k9").unwrap(), 0);
    }

    #[test]
    fn nested_writes_shadow_per_level() {
        let mut store = Store::new();
        scenarios::nested_writes(&mut store, "a", 4);

        assert_eq!(store.depth(), 4);
        assert_eq!(store.get("a").unwrap(), 4);
        store.rollback().unwrap();
        assert_eq!(store.get("a").unwrap(), 3);
    }

    #[test]
    fn nested_deletes_then_commit() {
        let mut store = populated_store(5, 1);
        scenarios::nested_deletes(&mut store, 3);

        assert_eq!(store.count(0), 2);
        store.commit();
        assert_eq!(store.count(0), 2);
        assert!(store.get("k2").is_err());
        assert_eq!(store.get("k3").unwrap(), 0);
    }

    #[test]
    fn store_and_model_agree_on_scripted_sequence() {
        let ops = vec![
            Operation::Set {
                key: "a".into(),
                value: 10,
            },
            Operation::Begin,
            Operation::Set {
                key: "a".into(),
                value: 20,
            },
            Operation::Get { key: "a".into() },
            Operation::Count { value: 10 },
            Operation::Count { value: 20 },
            Operation::Rollback,
            Operation::Get { key: "a".into() },
            Operation::Count { value: 10 },
            Operation::Rollback,
        ];

        assert_eq!(first_divergence(&ops), None);

        let outcomes = run_operations(&mut Store::new(), &ops);
        assert_eq!(outcomes[3], Outcome::Read(Ok(20)));
        assert_eq!(outcomes[4], Outcome::Count(0));
        assert_eq!(
            outcomes[9],
            Outcome::Depth(Err(CoreError::NoActiveTransaction))
        );
    }
}
