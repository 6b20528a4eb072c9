//! The overlay store must be observationally equivalent to the eager-copy
//! model for any operation sequence.

use nestkv_core::Store;
use nestkv_testkit::prelude::*;
use proptest::prelude::*;

fn visible(store: &Store) -> Vec<(String, i64)> {
    let mut entries: Vec<_> = ["a", "b", "c", "d", "e"]
        .iter()
        .filter_map(|key| store.get(key).ok().map(|v| (key.to_string(), v)))
        .collect();
    entries.sort();
    entries
}

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn store_matches_model(ops in operation_sequence_strategy(0, 80)) {
        prop_assert_eq!(first_divergence(&ops), None);
    }

    #[test]
    fn visible_state_matches_model_after_each_step(ops in operation_sequence_strategy(1, 60)) {
        let mut store = Store::new();
        let mut model = ReferenceStore::new();
        for op in &ops {
            apply(&mut store, op);
            apply(&mut model, op);
            prop_assert_eq!(visible(&store), model.visible());
            prop_assert_eq!(store.depth(), model.depth());
        }
    }

    #[test]
    fn counts_never_negative_under_nested_deletes(ops in nested_delete_sequence_strategy(100)) {
        let mut store = Store::new();
        for op in &ops {
            apply(&mut store, op);
            for value in -2..6 {
                prop_assert!(store.chain().aggregate_count(value) >= 0);
            }
        }
    }

    #[test]
    fn fuzz_target_accepts_arbitrary_bytes(data in prop::collection::vec(any::<u8>(), 0..256)) {
        fuzz_store_operations(&data);
    }
}

#[test]
fn deep_commit_stress_is_consistent() {
    let result = stress_deep_commit(&StressConfig::default());
    result.print_summary("deep commit");
    assert!(result.consistent);
}

#[test]
fn rollback_churn_stress_is_consistent() {
    let result = stress_rollback_churn(&StressConfig::default());
    result.print_summary("rollback churn");
    assert!(result.consistent);
}
