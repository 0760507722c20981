//! Error types for job creation.

use jobrank_queue::QueueError;
use thiserror::Error;

/// Errors that can occur while creating or reserving jobs.
#[derive(Error, Debug)]
pub enum EnqueueError {
    /// No queue name was given.
    #[error("jobs must be placed onto a queue")]
    MissingQueue,

    /// No job class was given.
    #[error("jobs must be given a class")]
    MissingClass,

    /// Queue error.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    /// Lock poisoned (thread panicked while holding lock).
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Failure reported by a post-enqueue hook.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct HookError(pub String);

/// Result type alias for enqueue operations.
pub type Result<T> = std::result::Result<T, EnqueueError>;
