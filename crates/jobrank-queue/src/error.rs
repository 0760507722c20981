//! Error types for queue operations.

use jobrank_models::PayloadError;
use jobrank_store::StoreError;
use thiserror::Error;

/// Errors that can occur during queue operations.
#[derive(Error, Debug)]
pub enum QueueError {
    /// Store error, propagated unmodified.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Payload could not be encoded or decoded.
    #[error("payload error: {0}")]
    Payload(#[from] PayloadError),

    /// Every optimistic pop attempt lost the head to another caller.
    #[error("pop on queue {queue} lost the head to concurrent callers {attempts} times")]
    PopContention { queue: String, attempts: usize },
}

/// Result type alias for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;
