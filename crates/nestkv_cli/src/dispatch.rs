//! Runs parsed commands against a store and renders the replies.

use crate::parse::Command;
use nestkv_core::{CoreError, Store, Value};
use std::fmt;

/// The outcome of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The command succeeded with nothing to report.
    Ok,
    /// A value read by `GET`.
    Value(Value),
    /// A count returned by `COUNT`.
    Count(u64),
    /// A recoverable store error.
    Error(CoreError),
    /// The session should end.
    End,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Value(value) => write!(f, "{value}"),
            Self::Count(count) => write!(f, "{count}"),
            Self::Error(err) => write!(f, "{err}"),
            Self::End => Ok(()),
        }
    }
}

/// Executes `command` against `store`.
pub fn execute(store: &mut Store, command: Command) -> Reply {
    match command {
        Command::Set { key, value } => {
            store.set(key, value);
            Reply::Ok
        }
        Command::Get { key } => match store.get(&key) {
            Ok(value) => Reply::Value(value),
            Err(err) => Reply::Error(err),
        },
        Command::Delete { key } => {
            store.delete(&key);
            Reply::Ok
        }
        Command::Count { value } => Reply::Count(store.count(value)),
        Command::Begin => {
            store.begin();
            Reply::Ok
        }
        Command::Rollback => match store.rollback() {
            Ok(_) => Reply::Ok,
            Err(err) => Reply::Error(err),
        },
        Command::Commit => {
            store.commit();
            Reply::Ok
        }
        Command::End => Reply::End,
    }
}
