//! FIFO list backend.

use std::sync::Arc;

use jobrank_models::JobPayload;
use jobrank_store::OrderedStore;

use crate::backend::{watch_queue, JobQueue, Peek};
use crate::error::Result;
use crate::keys::QueueKeys;

/// Plain arrival-order queue over a store list.
#[derive(Clone)]
pub struct FifoQueue {
    store: Arc<dyn OrderedStore>,
    keys: Arc<QueueKeys>,
}

impl FifoQueue {
    /// Creates a FIFO backend over `store`.
    pub fn new(store: Arc<dyn OrderedStore>, keys: Arc<QueueKeys>) -> Self {
        Self { store, keys }
    }
}

impl JobQueue for FifoQueue {
    fn push(&self, queue: &str, payload: &JobPayload) -> Result<()> {
        watch_queue(self.store.as_ref(), &self.keys, queue)?;
        self.store.list_push(&self.keys.queue(queue), &payload.encode()?)?;
        Ok(())
    }

    fn pop(&self, queue: &str) -> Result<Option<JobPayload>> {
        match self.store.list_pop_front(&self.keys.queue(queue))? {
            Some(raw) => Ok(Some(JobPayload::decode(&raw)?)),
            None => Ok(None),
        }
    }

    fn size(&self, queue: &str) -> Result<usize> {
        Ok(self.store.list_len(&self.keys.queue(queue))?)
    }

    fn peek(&self, queue: &str, start: usize, count: usize) -> Result<Peek> {
        let items = self
            .store
            .list_range(&self.keys.queue(queue), start, count)?
            .iter()
            .map(|raw| JobPayload::decode(raw))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Peek::from_items(items, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueueConfig;
    use jobrank_store::{KeyType, MemoryStore};
    use serde_json::json;

    fn make_fifo() -> (MemoryStore, FifoQueue) {
        let store = MemoryStore::new();
        let keys = Arc::new(QueueKeys::new(&QueueConfig::default()));
        (store.clone(), FifoQueue::new(Arc::new(store), keys))
    }

    fn job(n: i64) -> JobPayload {
        JobPayload::new("Mailer", vec![json!(n)])
    }

    #[test]
    fn test_push_creates_list() {
        let (store, fifo) = make_fifo();
        fifo.push("mail", &job(1)).unwrap();

        assert_eq!(store.key_type("queue:mail").unwrap(), KeyType::List);
        assert!(store.set_contains("queues", "mail").unwrap());
    }

    #[test]
    fn test_pop_in_insertion_order() {
        let (_, fifo) = make_fifo();
        for n in 0..3 {
            fifo.push("mail", &job(n)).unwrap();
        }

        assert_eq!(fifo.pop("mail").unwrap(), Some(job(0)));
        assert_eq!(fifo.pop("mail").unwrap(), Some(job(1)));
        assert_eq!(fifo.pop("mail").unwrap(), Some(job(2)));
        assert_eq!(fifo.pop("mail").unwrap(), None);
    }

    #[test]
    fn test_duplicates_allowed() {
        let (_, fifo) = make_fifo();
        fifo.push("mail", &job(1)).unwrap();
        fifo.push("mail", &job(1)).unwrap();

        assert_eq!(fifo.size("mail").unwrap(), 2);
    }

    #[test]
    fn test_peek() {
        let (_, fifo) = make_fifo();
        for n in 0..3 {
            fifo.push("mail", &job(n)).unwrap();
        }

        assert_eq!(fifo.peek("mail", 0, 1).unwrap(), Peek::Single(Some(job(0))));
        assert_eq!(
            fifo.peek("mail", 1, 5).unwrap(),
            Peek::Range(vec![job(1), job(2)])
        );
        assert_eq!(fifo.size("mail").unwrap(), 3);
    }
}
