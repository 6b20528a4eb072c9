//! Line → `Command` parsing.
//!
//! One command per line, fields separated by whitespace. Keywords are
//! matched case-insensitively; keys are taken verbatim. Argument-count and
//! integer errors are reported here so the store only ever sees well-formed
//! operations.

use nestkv_core::Value;
use thiserror::Error;

/// A well-formed command ready to run against a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `SET name value`
    Set {
        /// Key to write.
        key: String,
        /// Value to store.
        value: Value,
    },
    /// `GET name`
    Get {
        /// Key to read.
        key: String,
    },
    /// `DELETE name`
    Delete {
        /// Key to delete.
        key: String,
    },
    /// `COUNT value`
    Count {
        /// Value to count.
        value: Value,
    },
    /// `BEGIN`
    Begin,
    /// `ROLLBACK`
    Rollback,
    /// `COMMIT`
    Commit,
    /// `END`
    End,
}

impl Command {
    /// Returns the canonical keyword for this command.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Set { .. } => "SET",
            Self::Get { .. } => "GET",
            Self::Delete { .. } => "DELETE",
            Self::Count { .. } => "COUNT",
            Self::Begin => "BEGIN",
            Self::Rollback => "ROLLBACK",
            Self::Commit => "COMMIT",
            Self::End => "END",
        }
    }

    /// Returns true if the command can change the frame chain.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::Set { .. } | Self::Delete { .. } | Self::Begin | Self::Rollback | Self::Commit
        )
    }
}

/// Errors for lines that do not form a valid command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Wrong number of arguments.
    #[error("Usage: {usage}")]
    Usage {
        /// The expected form of the command.
        usage: &'static str,
    },

    /// A value argument was not an integer.
    #[error("invalid value: {value}")]
    InvalidValue {
        /// The offending argument.
        value: String,
    },

    /// The first word is not a known command.
    #[error("Unknown command: {command}")]
    UnknownCommand {
        /// The unrecognised word.
        command: String,
    },
}

const SET_USAGE: &str = "SET name value";
const GET_USAGE: &str = "GET name";
const DELETE_USAGE: &str = "DELETE name";
const COUNT_USAGE: &str = "COUNT value";

/// Parses one input line.
///
/// Returns `Ok(None)` for blank lines and `#` comments.
///
/// # Errors
///
/// Returns a [`ParseError`] for unknown commands, wrong argument counts and
/// non-integer values.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    let (word, args) = match fields.split_first() {
        Some((word, args)) => (*word, args),
        None => return Ok(None),
    };

    let command = match word.to_ascii_uppercase().as_str() {
        "SET" => match args {
            [key, value] => Command::Set {
                key: (*key).to_string(),
                value: parse_value(value)?,
            },
            _ => return Err(usage(SET_USAGE)),
        },
        "GET" => match args {
            [key] => Command::Get {
                key: (*key).to_string(),
            },
            _ => return Err(usage(GET_USAGE)),
        },
        "DELETE" => match args {
            [key] => Command::Delete {
                key: (*key).to_string(),
            },
            _ => return Err(usage(DELETE_USAGE)),
        },
        "COUNT" => match args {
            [value] => Command::Count {
                value: parse_value(value)?,
            },
            _ => return Err(usage(COUNT_USAGE)),
        },
        "BEGIN" => no_args(args, "BEGIN", Command::Begin)?,
        "ROLLBACK" => no_args(args, "ROLLBACK", Command::Rollback)?,
        "COMMIT" => no_args(args, "COMMIT", Command::Commit)?,
        "END" => no_args(args, "END", Command::End)?,
        _ => {
            return Err(ParseError::UnknownCommand {
                command: word.to_string(),
            })
        }
    };

    Ok(Some(command))
}

fn parse_value(raw: &str) -> Result<Value, ParseError> {
    raw.parse().map_err(|_| ParseError::InvalidValue {
        value: raw.to_string(),
    })
}

fn usage(usage: &'static str) -> ParseError {
    ParseError::Usage { usage }
}

fn no_args(args: &[&str], usage: &'static str, command: Command) -> Result<Command, ParseError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(ParseError::Usage { usage })
    }
}
