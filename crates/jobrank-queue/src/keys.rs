//! Key naming for queues and their registries.

use crate::config::QueueConfig;

/// Centralizes the store key naming scheme.
#[derive(Debug, Clone)]
pub struct QueueKeys {
    /// Prefix applied to every key, including its trailing `:`.
    prefix: String,
    /// Plain set of every queue name that has received a push.
    pub queues: String,
    /// Plain set of queue names marked priority-capable.
    pub priority_queues: String,
}

impl QueueKeys {
    /// Builds the key names for `config`.
    pub fn new(config: &QueueConfig) -> Self {
        let prefix = match config.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{}:", ns),
            _ => String::new(),
        };

        Self {
            queues: format!("{}{}", prefix, config.queues_key),
            priority_queues: format!("{}{}", prefix, config.priority_queues_key),
            prefix,
        }
    }

    /// Key holding the contents of queue `name`.
    pub fn queue(&self, name: &str) -> String {
        format!("{}queue:{}", self.prefix, name)
    }
}
