//! Queue backend implementations.
//!
//! This module contains the concrete implementations of the [`QueueService`]
//! trait: a non-durable in-memory backend and a durable file-system backend.
//!
//! [`QueueService`]: crate::service::QueueService

pub mod fs;
pub mod memory;

pub use fs::FileBackend;
pub use memory::InMemoryBackend;
