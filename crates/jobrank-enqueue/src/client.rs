//! JobClient - creates jobs on queues and reserves them back.

use jobrank_models::JobPayload;
use jobrank_queue::{JobQueue, Priority, QueueFacade};
use serde_json::Value;
use tracing::debug;

use crate::error::{EnqueueError, Result};
use crate::hooks::HookRegistry;
use crate::job::Job;

/// Entry point for creating and reserving jobs.
///
/// # Example
///
/// ```no_run
/// use jobrank_enqueue::{HookRegistry, JobClient};
/// use jobrank_queue::{QueueConfig, QueueFacade};
/// use jobrank_store::MemoryStore;
///
/// let queues = QueueFacade::new(MemoryStore::new(), QueueConfig::default());
/// let client = JobClient::new(queues, HookRegistry::new());
///
/// client.create_with_priority("reports", "MonthlyReport", 75, vec!["acme".into()]).unwrap();
///
/// let job = client.reserve("reports").unwrap().unwrap();
/// assert_eq!(job.priority, Some(75));
/// ```
#[derive(Clone)]
pub struct JobClient {
    queues: QueueFacade,
    hooks: HookRegistry,
}

impl JobClient {
    /// Creates a client over `queues`, running hooks from `hooks`.
    pub fn new(queues: QueueFacade, hooks: HookRegistry) -> Self {
        Self { queues, hooks }
    }

    /// The queue facade jobs are pushed through.
    pub fn queues(&self) -> &QueueFacade {
        &self.queues
    }

    /// The hook registry.
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Creates a job on `queue` through the dispatching push.
    ///
    /// FIFO queues append it; priority queues give it the default priority.
    pub fn create(&self, queue: &str, class: &str, args: Vec<Value>) -> Result<()> {
        validate(queue, class)?;

        let payload = JobPayload::new(class, args);
        self.queues.push(queue, &payload)?;
        debug!(queue, class, "created job");

        self.hooks.run_after_enqueue(class, &payload.args);
        Ok(())
    }

    /// Creates a job on `queue` with `priority`.
    ///
    /// Returns `true` when the job was new, `false` when an identical job
    /// (same class and arguments) was already queued and has been re-scored.
    pub fn create_with_priority(
        &self,
        queue: &str,
        class: &str,
        priority: impl Into<Priority>,
        args: Vec<Value>,
    ) -> Result<bool> {
        validate(queue, class)?;

        let payload = JobPayload::new(class, args);
        let added = self.queues.push_with_priority(queue, &payload, priority)?;
        debug!(queue, class, added, "created job with priority");

        self.hooks.run_after_enqueue(class, &payload.args);
        Ok(added)
    }

    /// Creates a job, or re-scores the identical job already queued.
    ///
    /// Same as [`create_with_priority`](Self::create_with_priority): the
    /// store keys priority queue entries by payload.
    pub fn create_or_update_priority(
        &self,
        queue: &str,
        class: &str,
        priority: impl Into<Priority>,
        args: Vec<Value>,
    ) -> Result<bool> {
        self.create_with_priority(queue, class, priority, args)
    }

    /// Pops the next job from `queue`, or `None` if it is empty.
    pub fn reserve(&self, queue: &str) -> Result<Option<Job>> {
        if queue.is_empty() {
            return Err(EnqueueError::MissingQueue);
        }
        Ok(self.queues.pop(queue)?.map(|payload| Job::new(queue, payload)))
    }
}

fn validate(queue: &str, class: &str) -> Result<()> {
    if queue.is_empty() {
        return Err(EnqueueError::MissingQueue);
    }
    if class.trim().is_empty() {
        return Err(EnqueueError::MissingClass);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobrank_queue::{QueueConfig, PRIORITY_MULTIPLIER};
    use jobrank_store::MemoryStore;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    const T0: i64 = 1_700_000_000;

    fn make_client() -> JobClient {
        let queues = QueueFacade::new(MemoryStore::new(), QueueConfig::default()).with_clock(|| T0);
        JobClient::new(queues, HookRegistry::new())
    }

    #[test]
    fn test_missing_queue() {
        let client = make_client();
        let result = client.create_with_priority("", "Mailer", 10, vec![]);
        assert!(matches!(result, Err(EnqueueError::MissingQueue)));
        assert!(matches!(client.create("", "Mailer", vec![]), Err(EnqueueError::MissingQueue)));
        assert!(matches!(client.reserve(""), Err(EnqueueError::MissingQueue)));
    }

    #[test]
    fn test_missing_class() {
        let client = make_client();
        let result = client.create_with_priority("mail", "  ", 10, vec![]);
        assert!(matches!(result, Err(EnqueueError::MissingClass)));
        assert_eq!(client.queues().size("mail").unwrap(), 0);
    }

    #[test]
    fn test_create_with_priority_stores_inverted_level() {
        let client = make_client();
        client
            .create_with_priority("mail", "Mailer", 75, vec![])
            .unwrap();

        let payload = JobPayload::new("Mailer", vec![]);
        assert_eq!(
            client.queues().score("mail", &payload).unwrap(),
            Some(925 * PRIORITY_MULTIPLIER + T0)
        );
    }

    #[test]
    fn test_create_or_update_rescores() {
        let client = make_client();
        assert!(client
            .create_or_update_priority("mail", "Mailer", 75, vec![])
            .unwrap());
        assert!(!client
            .create_or_update_priority("mail", "Mailer", 975, vec![])
            .unwrap());

        let payload = JobPayload::new("Mailer", vec![]);
        assert_eq!(client.queues().size("mail").unwrap(), 1);
        assert_eq!(
            client.queues().score("mail", &payload).unwrap(),
            Some(25 * PRIORITY_MULTIPLIER + T0)
        );
    }

    #[test]
    fn test_reserve_recovers_priority() {
        let client = make_client();
        client
            .create_with_priority("mail", "Mailer", 77, vec![json!("asdf"), json!("jkl;")])
            .unwrap();

        let job = client.reserve("mail").unwrap().unwrap();
        assert_eq!(job.priority, Some(77));
        assert_eq!(job.class(), "Mailer");
        assert_eq!(job.args(), &[json!("asdf"), json!("jkl;")]);
        assert_eq!(job.queue, "mail");
        assert!(client.reserve("mail").unwrap().is_none());
    }

    #[test]
    fn test_plain_create_on_fifo_queue() {
        let client = make_client();
        client.create("mail", "Mailer", vec![json!(1)]).unwrap();
        client.create("mail", "Mailer", vec![json!(2)]).unwrap();

        assert!(!client.queues().is_priority_set("mail").unwrap());
        let first = client.reserve("mail").unwrap().unwrap();
        assert_eq!(first.args(), &[json!(1)]);
        assert_eq!(first.priority, None);
    }

    #[test]
    fn test_hooks_run_after_push() {
        let client = make_client();
        let observed = Arc::new(Mutex::new(None));

        let probe_queues = client.queues().clone();
        let sink = observed.clone();
        client
            .hooks()
            .register_fn("Mailer", "count", move |args| {
                let size = probe_queues.size("mail").unwrap_or(0);
                *sink.lock().unwrap() = Some((size, args.to_vec()));
                Ok(())
            })
            .unwrap();

        client
            .create_with_priority("mail", "Mailer", 5, vec![json!("x")])
            .unwrap();

        assert_eq!(*observed.lock().unwrap(), Some((1, vec![json!("x")])));
    }

    #[test]
    fn test_hooks_not_run_on_validation_failure() {
        let client = make_client();
        let ran = Arc::new(Mutex::new(false));

        let flag = ran.clone();
        client
            .hooks()
            .register_fn("Mailer", "flag", move |_| {
                *flag.lock().unwrap() = true;
                Ok(())
            })
            .unwrap();

        assert!(client.create_with_priority("", "Mailer", 5, vec![]).is_err());
        assert!(!*ran.lock().unwrap());
    }
}
