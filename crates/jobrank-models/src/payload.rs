//! Job payload record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// A serialized unit of work: the job class and its argument list.
///
/// The encoded form doubles as the identity of the job inside a priority
/// queue, so two payloads with the same class, arguments and extra fields
/// are the same member.
///
/// `priority` and `created_at` are only populated on payloads returned by a
/// priority-queue pop. They hold the decoded score parts: `priority` is the
/// stored level (`0` is served first), not the caller-facing priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    /// Job class identifier.
    pub class: String,
    /// Positional arguments.
    #[serde(default)]
    pub args: Vec<Value>,
    /// Stored priority level decoded from the score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// Insertion time (unix seconds) decoded from the score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Any other fields carried by the record, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobPayload {
    /// Creates a payload for `class` with the given arguments.
    pub fn new(class: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            class: class.into(),
            args,
            priority: None,
            created_at: None,
            extra: Map::new(),
        }
    }

    /// Appends a single argument.
    pub fn with_arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds an extra top-level field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Encodes the payload into its stored form.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a payload from its stored form.
    pub fn decode(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
