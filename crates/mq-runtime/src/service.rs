//! The queue service contract, backend configuration, and factory.

use crate::backends::{FileBackend, InMemoryBackend};
use crate::error::QueueError;
use crate::message::{Message, QueueName, ReceiptHandle};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

/// Capability surface shared by every backend.
///
/// A remote adapter targeting a hosted queue service would implement this
/// same trait by mapping the three operations 1:1 onto the hosted API's
/// send/receive/delete, passing the visibility timeout through unmodified and
/// mapping "zero messages returned" to `Ok(None)`.
#[async_trait]
pub trait QueueService: Send + Sync {
    /// Store a new message on the queue, creating the queue on first use.
    ///
    /// The message is immediately visible to `pull`. A storage failure is
    /// fatal and propagated; a push never loses a message silently.
    async fn push(&self, queue: &QueueName, body: Bytes) -> Result<(), QueueError>;

    /// Lease one currently visible message, hiding it from other callers for
    /// `visibility_timeout` (negative durations are treated as zero).
    ///
    /// One call is one non-blocking scan: `Ok(None)` means nothing was
    /// eligible *right now*, never that the queue is permanently empty.
    /// Callers wanting blocking semantics poll with their own retry policy
    /// and cancellation deadline. No ordering across messages is promised.
    async fn pull(
        &self,
        queue: &QueueName,
        visibility_timeout: Duration,
    ) -> Result<Option<Message>, QueueError>;

    /// Remove a message permanently. Idempotent: unknown queues and unknown
    /// or already-deleted handles are a no-op.
    async fn delete(
        &self,
        queue: &QueueName,
        receipt_handle: &ReceiptHandle,
    ) -> Result<(), QueueError>;
}

/// Backend selection for [`QueueServiceFactory`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BackendConfig {
    /// Non-durable, process-local storage
    InMemory,
    /// File-system storage, durable across restarts and shareable between
    /// processes
    File(FileStoreConfig),
}

/// Configuration for the file-system backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStoreConfig {
    /// Storage root; one subdirectory per queue is created beneath it
    pub root: PathBuf,
}

/// Factory for creating queue services with the configured backend
pub struct QueueServiceFactory;

impl QueueServiceFactory {
    /// Create a queue service from configuration
    pub fn create(config: BackendConfig) -> Result<Box<dyn QueueService>, QueueError> {
        match config {
            BackendConfig::InMemory => Ok(Box::new(InMemoryBackend::new())),
            BackendConfig::File(config) => Ok(Box::new(FileBackend::new(config)?)),
        }
    }

    /// Create an in-memory service for tests
    pub fn create_test_service() -> Box<dyn QueueService> {
        Box::new(InMemoryBackend::new())
    }
}
