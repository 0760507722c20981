//! Priority-ordered backend over a store sorted set.
//!
//! Members are encoded payloads and scores come from the [`codec`](crate::codec).
//! The store de-duplicates by member, so pushing an identical payload again
//! re-scores it instead of adding a second entry.

use std::sync::Arc;

use jobrank_models::JobPayload;
use jobrank_store::OrderedStore;
use tracing::{debug, warn};

use crate::backend::{watch_queue, JobQueue, Peek};
use crate::codec::{self, Priority};
use crate::error::{QueueError, Result};
use crate::keys::QueueKeys;

/// Source of insertion time, in unix seconds.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Priority queue backend.
///
/// # Pop protocol
///
/// The store reads and removes in separate calls, so a pop reads the head
/// together with its score and then removes it only if that exact
/// `(member, score)` pair is still present. Exactly one caller can win that
/// removal. A loser re-reads the new head, up to `max_attempts` times.
#[derive(Clone)]
pub struct PriorityStore {
    store: Arc<dyn OrderedStore>,
    keys: Arc<QueueKeys>,
    clock: Clock,
    max_attempts: usize,
}

impl PriorityStore {
    /// Creates a priority backend over `store`.
    pub fn new(
        store: Arc<dyn OrderedStore>,
        keys: Arc<QueueKeys>,
        clock: Clock,
        max_attempts: usize,
    ) -> Self {
        Self {
            store,
            keys,
            clock,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Inserts `payload` scored for `priority` at the current clock time.
    ///
    /// Returns `true` when the payload was new, `false` when an existing
    /// entry was re-scored.
    pub fn push_with_priority(
        &self,
        queue: &str,
        payload: &JobPayload,
        priority: &Priority,
    ) -> Result<bool> {
        let score = codec::score_at(priority, (self.clock)());
        watch_queue(self.store.as_ref(), &self.keys, queue)?;
        let added = self
            .store
            .sorted_insert(&self.keys.queue(queue), &payload.encode()?, score)?;
        debug!(queue, score, added, "pushed job onto priority queue");
        Ok(added)
    }

    /// Score currently held by `payload`, if queued.
    pub fn score(&self, queue: &str, payload: &JobPayload) -> Result<Option<i64>> {
        Ok(self
            .store
            .sorted_score(&self.keys.queue(queue), &payload.encode()?)?)
    }
}

impl JobQueue for PriorityStore {
    fn push(&self, queue: &str, payload: &JobPayload) -> Result<()> {
        self.push_with_priority(queue, payload, &Priority::default())?;
        Ok(())
    }

    fn pop(&self, queue: &str) -> Result<Option<JobPayload>> {
        let key = self.keys.queue(queue);

        for attempt in 1..=self.max_attempts {
            let Some((member, score)) = self.store.sorted_range(&key, 0, 1)?.into_iter().next()
            else {
                return Ok(None);
            };

            if self.store.sorted_remove(&key, &member, Some(score))? {
                let parts = codec::decode(score);
                let mut payload = JobPayload::decode(&member)?;
                payload.priority = Some(parts.priority);
                payload.created_at = Some(parts.inserted_at);
                return Ok(Some(payload));
            }

            warn!(queue, attempt, "lost queue head to a concurrent pop, retrying");
        }

        Err(QueueError::PopContention {
            queue: queue.to_string(),
            attempts: self.max_attempts,
        })
    }

    fn size(&self, queue: &str) -> Result<usize> {
        Ok(self.store.sorted_len(&self.keys.queue(queue))?)
    }

    fn peek(&self, queue: &str, start: usize, count: usize) -> Result<Peek> {
        let items = self
            .store
            .sorted_range(&self.keys.queue(queue), start, count)?
            .iter()
            .map(|(member, _)| JobPayload::decode(member))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Peek::from_items(items, count))
    }
}
