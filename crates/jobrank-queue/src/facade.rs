//! QueueFacade - representation-agnostic queue access.
//!
//! Every call asks the store which representation the queue holds right
//! now and routes to the matching backend:
//! - sorted set: [`PriorityStore`]
//! - anything else, including a queue that does not exist yet: [`FifoQueue`]
//!
//! Nothing about the representation is cached, so a queue that receives its
//! first priority push is served in priority order from the next call on.
//!
//! The type check and the backend call are two round trips. If another
//! client changes the representation in between, the backend fails with
//! `StoreError::WrongType`; the call is then routed once more against the
//! fresh type before the error is surfaced.

use std::sync::Arc;

use jobrank_models::JobPayload;
use jobrank_store::{KeyType, OrderedStore, StoreError};
use tracing::debug;

use crate::backend::{JobQueue, Peek};
use crate::codec::{now_epoch_seconds, Priority};
use crate::config::QueueConfig;
use crate::error::{QueueError, Result};
use crate::fifo::FifoQueue;
use crate::keys::QueueKeys;
use crate::priority::{Clock, PriorityStore};

/// Dispatching front for FIFO and priority queues.
///
/// # Example
///
/// ```no_run
/// use jobrank_models::JobPayload;
/// use jobrank_queue::{JobQueue, NamedPriority, QueueConfig, QueueFacade};
/// use jobrank_store::MemoryStore;
///
/// let queues = QueueFacade::new(MemoryStore::new(), QueueConfig::default());
///
/// let urgent = JobPayload::new("Resize", vec!["a.png".into()]);
/// queues.push_with_priority("images", &urgent, NamedPriority::Highest).unwrap();
///
/// // Plain pushes to a priority queue get the default priority.
/// queues.push("images", &JobPayload::new("Resize", vec!["b.png".into()])).unwrap();
///
/// let next = queues.pop("images").unwrap().unwrap();
/// assert_eq!(next.args[0], "a.png");
/// ```
#[derive(Clone)]
pub struct QueueFacade {
    store: Arc<dyn OrderedStore>,
    keys: Arc<QueueKeys>,
    config: QueueConfig,
    fifo: FifoQueue,
    priority: PriorityStore,
}

impl QueueFacade {
    /// Creates a facade over `store`.
    pub fn new<S: OrderedStore + 'static>(store: S, config: QueueConfig) -> Self {
        let store: Arc<dyn OrderedStore> = Arc::new(store);
        Self::build(store, config, Arc::new(now_epoch_seconds))
    }

    fn build(store: Arc<dyn OrderedStore>, config: QueueConfig, clock: Clock) -> Self {
        let keys = Arc::new(QueueKeys::new(&config));
        Self {
            fifo: FifoQueue::new(store.clone(), keys.clone()),
            priority: PriorityStore::new(
                store.clone(),
                keys.clone(),
                clock,
                config.pop_max_attempts,
            ),
            store,
            keys,
            config,
        }
    }

    /// Replaces the insertion-time source used for scoring.
    pub fn with_clock(self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        Self::build(self.store, self.config, Arc::new(clock))
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// True iff the store currently holds `queue` as a sorted set.
    pub fn is_priority_set(&self, queue: &str) -> Result<bool> {
        Ok(self.store.key_type(&self.keys.queue(queue))? == KeyType::SortedSet)
    }

    fn backend(&self, queue: &str) -> Result<&dyn JobQueue> {
        if self.is_priority_set(queue)? {
            debug!(queue, path = "priority", "dispatching queue call");
            Ok(&self.priority)
        } else {
            debug!(queue, path = "fifo", "dispatching queue call");
            Ok(&self.fifo)
        }
    }

    /// Runs `op` against the backend for `queue`, re-routing once if the
    /// representation changed after it was read.
    fn dispatch<T>(&self, queue: &str, op: impl Fn(&dyn JobQueue) -> Result<T>) -> Result<T> {
        match op(self.backend(queue)?) {
            Err(QueueError::Store(StoreError::WrongType { found, .. })) => {
                debug!(queue, %found, "representation changed mid-call, re-dispatching");
                op(self.backend(queue)?)
            }
            other => other,
        }
    }

    /// Pushes onto the priority path regardless of the current representation.
    ///
    /// This is how a queue becomes a priority queue. The store rejects the
    /// push while the queue is a non-empty FIFO list.
    ///
    /// Returns `true` when the payload was new, `false` when re-scored.
    pub fn push_with_priority(
        &self,
        queue: &str,
        payload: &JobPayload,
        priority: impl Into<Priority>,
    ) -> Result<bool> {
        self.priority
            .push_with_priority(queue, payload, &priority.into())
    }

    /// Score currently held by `payload` in a priority queue.
    pub fn score(&self, queue: &str, payload: &JobPayload) -> Result<Option<i64>> {
        self.priority.score(queue, payload)
    }

    /// Whether `queue` is registered as priority-capable.
    ///
    /// Reflects intent, not the live representation.
    pub fn priority_enabled(&self, queue: &str) -> Result<bool> {
        Ok(self.store.set_contains(&self.keys.priority_queues, queue)?)
    }

    /// Registers `queue` as priority-capable. Returns `true` when newly registered.
    pub fn enable_priority(&self, queue: &str) -> Result<bool> {
        Ok(self.store.set_add(&self.keys.priority_queues, queue)?)
    }

    /// Names of every queue that has received a push, sorted.
    pub fn queues(&self) -> Result<Vec<String>> {
        Ok(self.store.set_members(&self.keys.queues)?)
    }

    /// Deletes the contents of `queue` and forgets its name.
    ///
    /// The queue reports FIFO again afterwards.
    pub fn remove_queue(&self, queue: &str) -> Result<()> {
        self.store.set_remove(&self.keys.queues, queue)?;
        self.store.delete(&self.keys.queue(queue))?;
        debug!(queue, "removed queue");
        Ok(())
    }
}

impl JobQueue for QueueFacade {
    fn push(&self, queue: &str, payload: &JobPayload) -> Result<()> {
        self.dispatch(queue, |backend| backend.push(queue, payload))
    }

    fn pop(&self, queue: &str) -> Result<Option<JobPayload>> {
        self.dispatch(queue, |backend| backend.pop(queue))
    }

    fn size(&self, queue: &str) -> Result<usize> {
        self.dispatch(queue, |backend| backend.size(queue))
    }

    fn peek(&self, queue: &str, start: usize, count: usize) -> Result<Peek> {
        self.dispatch(queue, |backend| backend.peek(queue, start, count))
    }
}
