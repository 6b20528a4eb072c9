//! Error types for NestKV core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in NestKV core operations.
///
/// Both kinds are recoverable: the store is left unchanged and the session
/// keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The key has no visible value (never set, or deleted in a frame that
    /// shadows every older value).
    #[error("KEY NOT FOUND: {key}")]
    KeyNotFound {
        /// The key that was looked up.
        key: String,
    },

    /// Rollback was requested while only the base frame exists.
    #[error("NO TRANSACTION")]
    NoActiveTransaction,
}

impl CoreError {
    /// Creates a key not found error.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Returns true if this is a key not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            CoreError::key_not_found("a").to_string(),
            "KEY NOT FOUND: a"
        );
        assert_eq!(CoreError::NoActiveTransaction.to_string(), "NO TRANSACTION");
    }

    #[test]
    fn not_found_predicate() {
        assert!(CoreError::key_not_found("a").is_not_found());
        assert!(!CoreError::NoActiveTransaction.is_not_found());
    }
}
