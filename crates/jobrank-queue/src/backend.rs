//! The queue interface shared by every representation.

use jobrank_models::JobPayload;
use jobrank_store::OrderedStore;

use crate::error::Result;
use crate::keys::QueueKeys;

/// Result of a non-destructive read.
#[derive(Debug, Clone, PartialEq)]
pub enum Peek {
    /// A single-element read (`count == 1`); `None` when the queue is empty.
    Single(Option<JobPayload>),
    /// A multi-element read in dispatch order, possibly empty.
    Range(Vec<JobPayload>),
}

impl Peek {
    pub(crate) fn from_items(items: Vec<JobPayload>, count: usize) -> Self {
        if count == 1 {
            Peek::Single(items.into_iter().next())
        } else {
            Peek::Range(items)
        }
    }

    /// Flattens the read into a list.
    pub fn into_vec(self) -> Vec<JobPayload> {
        match self {
            Peek::Single(item) => item.into_iter().collect(),
            Peek::Range(items) => items,
        }
    }

    /// True when nothing was read.
    pub fn is_empty(&self) -> bool {
        match self {
            Peek::Single(item) => item.is_none(),
            Peek::Range(items) => items.is_empty(),
        }
    }
}

/// Push, pop, size and peek against a named queue.
///
/// None of the operations block: an empty queue pops `None` immediately.
pub trait JobQueue: Send + Sync {
    /// Adds `payload` to `queue`.
    fn push(&self, queue: &str, payload: &JobPayload) -> Result<()>;

    /// Removes and returns the next payload to dispatch.
    fn pop(&self, queue: &str) -> Result<Option<JobPayload>>;

    /// Number of payloads waiting in `queue`.
    fn size(&self, queue: &str) -> Result<usize>;

    /// Reads `count` payloads starting at offset `start` without removing them.
    fn peek(&self, queue: &str, start: usize, count: usize) -> Result<Peek>;
}

/// Records `queue` in the discovery set.
pub(crate) fn watch_queue(store: &dyn OrderedStore, keys: &QueueKeys, queue: &str) -> Result<()> {
    store.set_add(&keys.queues, queue)?;
    Ok(())
}
