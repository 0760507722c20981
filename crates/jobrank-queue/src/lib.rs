//! Priority dispatch for Jobrank job queues.
//!
//! Queues normally hand out work in arrival order from a store list. This
//! crate lets any queue be served in priority order instead, without the
//! caller changing how it talks to the queue:
//! - [`codec`] packs a priority and an insertion time into one sortable score
//! - [`PriorityStore`] keeps a queue as a scored sorted set, with a pop that
//!   delivers each payload to exactly one caller
//! - [`FifoQueue`] is the plain list path
//! - [`QueueFacade`] inspects the stored representation on every call and
//!   routes to the right backend
//!
//! # Example
//!
//! ```no_run
//! use jobrank_models::JobPayload;
//! use jobrank_queue::{JobQueue, QueueConfig, QueueFacade};
//! use jobrank_store::MemoryStore;
//!
//! let queues = QueueFacade::new(MemoryStore::new(), QueueConfig::from_env());
//!
//! queues.push_with_priority("mail", &JobPayload::new("Digest", vec![]), 10).unwrap();
//! queues.push_with_priority("mail", &JobPayload::new("Reset", vec![]), "high").unwrap();
//!
//! assert_eq!(queues.pop("mail").unwrap().unwrap().class, "Reset");
//! ```

pub mod backend;
pub mod codec;
pub mod config;
pub mod error;
pub mod facade;
pub mod fifo;
pub mod keys;
pub mod priority;

pub use backend::{JobQueue, Peek};
pub use codec::{
    decode, encode, to_caller_priority, NamedPriority, Priority, ScoreParts, MAX_PRIORITY,
    MIN_PRIORITY, PRIORITY_MULTIPLIER,
};
pub use config::QueueConfig;
pub use error::{QueueError, Result};
pub use facade::QueueFacade;
pub use fifo::FifoQueue;
pub use keys::QueueKeys;
pub use priority::{Clock, PriorityStore};
