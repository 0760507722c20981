//! Error types for payload serialization.

use thiserror::Error;

/// Errors that can occur while encoding or decoding a job payload.
#[derive(Error, Debug)]
pub enum PayloadError {
    /// The payload could not be serialized or the stored bytes are not a payload.
    #[error("payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for payload operations.
pub type Result<T> = std::result::Result<T, PayloadError>;
