//! Queue configuration.

/// Environment variable for the key namespace.
pub const NAMESPACE_ENV: &str = "JOBRANK_NAMESPACE";

/// Environment variable for the optimistic pop retry bound.
pub const POP_MAX_ATTEMPTS_ENV: &str = "JOBRANK_POP_MAX_ATTEMPTS";

const DEFAULT_POP_MAX_ATTEMPTS: usize = 16;
const DEFAULT_QUEUES_KEY: &str = "queues";
const DEFAULT_PRIORITY_QUEUES_KEY: &str = "priority_queues";

/// Configuration for a [`QueueFacade`](crate::QueueFacade).
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Prefix for every key, e.g. `resque` gives `resque:queue:<name>`.
    pub namespace: Option<String>,
    /// How many times a pop retries after losing the head to another caller.
    pub pop_max_attempts: usize,
    /// Name of the queue discovery set.
    pub queues_key: String,
    /// Name of the registered priority-queue set.
    pub priority_queues_key: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            pop_max_attempts: DEFAULT_POP_MAX_ATTEMPTS,
            queues_key: DEFAULT_QUEUES_KEY.to_string(),
            priority_queues_key: DEFAULT_PRIORITY_QUEUES_KEY.to_string(),
        }
    }
}

impl QueueConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a config from the environment.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(namespace) = lookup(NAMESPACE_ENV).filter(|ns| !ns.is_empty()) {
            config.namespace = Some(namespace);
        }
        if let Some(attempts) = lookup(POP_MAX_ATTEMPTS_ENV).and_then(|v| v.parse().ok()) {
            config = config.with_pop_max_attempts(attempts);
        }

        config
    }

    /// Sets the key namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the pop retry bound. Values below 1 are raised to 1.
    pub fn with_pop_max_attempts(mut self, attempts: usize) -> Self {
        self.pop_max_attempts = attempts.max(1);
        self
    }

    /// Sets the name of the queue discovery set.
    pub fn with_queues_key(mut self, key: impl Into<String>) -> Self {
        self.queues_key = key.into();
        self
    }

    /// Sets the name of the registered priority-queue set.
    pub fn with_priority_queues_key(mut self, key: impl Into<String>) -> Self {
        self.priority_queues_key = key.into();
        self
    }
}
