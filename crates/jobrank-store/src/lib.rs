//! Ordered key-value store layer for Jobrank.
//!
//! Queues live in a store that offers two collection types per key: a plain
//! list (append at tail, remove at head) and a sorted set (member to score,
//! ordered by score). The [`OrderedStore`] trait is the contract the queue
//! layer consumes; [`MemoryStore`] is a thread-safe in-process backend.
//!
//! # Example
//!
//! ```no_run
//! use jobrank_store::{KeyType, MemoryStore, OrderedStore};
//!
//! let store = MemoryStore::new();
//! store.sorted_insert("queue:mail", "job-a", 20).unwrap();
//! store.sorted_insert("queue:mail", "job-b", 10).unwrap();
//!
//! assert_eq!(store.key_type("queue:mail").unwrap(), KeyType::SortedSet);
//! let head = store.sorted_range("queue:mail", 0, 1).unwrap();
//! assert_eq!(head[0].0, "job-b");
//! ```

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use traits::{KeyType, OrderedStore};
