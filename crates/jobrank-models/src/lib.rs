//! Core data models for Jobrank.
//!
//! This crate provides the job payload record shared by the queue and the
//! enqueue layers, together with the serializer that turns a payload into
//! the opaque member string stored in a queue.

pub mod error;
pub mod payload;

pub use error::{PayloadError, Result};
pub use payload::JobPayload;
