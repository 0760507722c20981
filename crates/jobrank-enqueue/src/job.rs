//! A job reserved from a queue.

use chrono::{DateTime, Utc};
use jobrank_models::JobPayload;
use jobrank_queue::to_caller_priority;
use serde_json::Value;

/// A dequeued job ready for a worker.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    /// Queue the job was taken from.
    pub queue: String,
    /// The payload as stored, including decoded score parts.
    pub payload: JobPayload,
    /// Caller-facing priority the job was created with.
    ///
    /// `None` for jobs taken from a FIFO queue.
    pub priority: Option<i64>,
    /// When the job was pushed, to the second.
    pub inserted_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Builds a job from a popped payload.
    pub fn new(queue: impl Into<String>, payload: JobPayload) -> Self {
        Self {
            queue: queue.into(),
            priority: payload.priority.map(to_caller_priority),
            inserted_at: payload
                .created_at
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            payload,
        }
    }

    /// Job class identifier.
    pub fn class(&self) -> &str {
        &self.payload.class
    }

    /// Job arguments.
    pub fn args(&self) -> &[Value] {
        &self.payload.args
    }
}
