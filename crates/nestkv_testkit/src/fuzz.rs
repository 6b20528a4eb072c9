//! Fuzz testing harnesses for NestKV.
//!
//! This module provides fuzz targets that can be used with cargo-fuzz
//! or other fuzzing frameworks.

use crate::fixtures::first_divergence;
use crate::generators::Operation;
use nestkv_core::Value;

/// Decodes arbitrary bytes into an operation sequence.
///
/// Each operation takes two bytes: an opcode and an argument. Keys and
/// values are folded into small domains so operations collide often.
pub fn decode_operations(data: &[u8]) -> Vec<Operation> {
    data.chunks_exact(2)
        .map(|pair| {
            let (op, arg) = (pair[0], pair[1]);
            let key = format!("k{}", arg % 6);
            let value = Value::from(arg % 5) - 1;
            match op % 7 {
                0 | 1 => Operation::Set { key, value },
                2 => Operation::Get { key },
                3 => Operation::Delete { key },
                4 => Operation::Count { value },
                5 => {
                    if arg % 3 == 0 {
                        Operation::Commit
                    } else {
                        Operation::Begin
                    }
                }
                _ => Operation::Rollback,
            }
        })
        .collect()
}

/// Fuzz target for store operations.
///
/// Replays the decoded sequence against the overlay store and the
/// eager-copy model and panics on the first differing outcome.
pub fn fuzz_store_operations(data: &[u8]) {
    let ops = decode_operations(data);
    if let Some((index, actual, expected)) = first_divergence(&ops) {
        panic!(
            "divergence at operation {index} ({:?}): store {actual:?}, model {expected:?}",
            ops[index]
        );
    }
}
