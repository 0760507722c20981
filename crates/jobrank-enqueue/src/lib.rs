//! Job creation with priority for Jobrank.
//!
//! This crate provides the `JobClient`, which validates and builds job
//! payloads, pushes them through a [`QueueFacade`](jobrank_queue::QueueFacade)
//! and runs post-enqueue hooks:
//! - `create` pushes through the dispatching path
//! - `create_with_priority` / `create_or_update_priority` push onto the
//!   priority path, re-scoring an identical job if one is already queued
//! - `reserve` pops a job and recovers the priority it was created with
//!
//! # Example
//!
//! ```no_run
//! use jobrank_enqueue::{HookRegistry, JobClient};
//! use jobrank_queue::{QueueConfig, QueueFacade};
//! use jobrank_store::MemoryStore;
//!
//! let hooks = HookRegistry::new();
//! hooks
//!     .register_fn("Invoice", "audit", |args| {
//!         println!("queued invoice {:?}", args);
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let queues = QueueFacade::new(MemoryStore::new(), QueueConfig::default());
//! let client = JobClient::new(queues, hooks);
//! client.create_with_priority("billing", "Invoice", "high", vec![42.into()]).unwrap();
//! ```

pub mod client;
pub mod error;
pub mod hooks;
pub mod job;

pub use client::JobClient;
pub use error::{EnqueueError, HookError, Result};
pub use hooks::{EnqueueHook, HookRegistry};
pub use job::Job;
