//! # NestKV Core
//!
//! In-memory key/value store with nested transactions.
//!
//! This crate provides:
//! - A chain of overlay frames, one per open transaction, over a permanent
//!   base frame
//! - Reads that resolve a key from the innermost frame outward
//! - A value-frequency index answering "how many keys hold `v`" in time
//!   proportional to nesting depth
//! - Commit that folds the whole chain into the base, and rollback that
//!   discards the innermost frame

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod chain;
mod config;
mod error;
mod frame;
mod snapshot;
mod stats;
mod store;
mod types;

pub use chain::FrameChain;
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use frame::{Frame, Lookup};
pub use snapshot::FrameSnapshot;
pub use stats::StoreStats;
pub use store::Store;
pub use types::{FrameId, Value};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
