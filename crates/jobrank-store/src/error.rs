//! Error types for store operations.

use thiserror::Error;

use crate::traits::KeyType;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The key holds a collection of another type.
    #[error("wrong type for key {key}: expected {expected}, found {found}")]
    WrongType {
        key: String,
        expected: KeyType,
        found: KeyType,
    },

    /// Lock poisoned (thread panicked while holding lock).
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
