//! In-memory queue backend.
//!
//! Non-durable and process-local: nothing survives a restart and nothing is
//! visible to other processes. Each message entry carries its own lease
//! mutex, which guards the deadline itself; there is no separate lock
//! side-table to keep in sync with the store.
//!
//! There is no coarse per-queue lock. A pull scans a snapshot and competes
//! for individual entries, so a contended or mid-transition entry never
//! stalls other callers; they simply skip it.

use crate::error::QueueError;
use crate::message::{Message, QueueName, ReceiptHandle, Timestamp};
use crate::service::QueueService;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

/// One live message: immutable identity and body, plus the lease deadline
/// behind its per-message lock. A caller holding the mutex owns the lease
/// transition; everyone else skips the entry.
#[derive(Debug)]
struct MessageEntry {
    receipt_handle: ReceiptHandle,
    body: Bytes,
    lease: Mutex<Timestamp>,
}

/// In-memory implementation of [`QueueService`]
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    queues: DashMap<QueueName, Vec<Arc<MessageEntry>>>,
}

impl InMemoryBackend {
    /// Create a new empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the entry is still present in the queue. An entry can be
    /// deleted between taking the scan snapshot and winning its lock.
    fn is_live(&self, queue: &QueueName, entry: &Arc<MessageEntry>) -> bool {
        self.queues
            .get(queue)
            .is_some_and(|entries| entries.iter().any(|e| Arc::ptr_eq(e, entry)))
    }
}

#[async_trait]
impl QueueService for InMemoryBackend {
    async fn push(&self, queue: &QueueName, body: Bytes) -> Result<(), QueueError> {
        let receipt_handle = ReceiptHandle::generate();
        let entry = Arc::new(MessageEntry {
            receipt_handle: receipt_handle.clone(),
            body,
            // deadline = now: a fresh message is immediately visible
            lease: Mutex::new(Timestamp::now()),
        });
        self.queues.entry(queue.clone()).or_default().push(entry);
        debug!(queue = %queue, receipt_handle = %receipt_handle, "message pushed");
        Ok(())
    }

    async fn pull(
        &self,
        queue: &QueueName,
        visibility_timeout: Duration,
    ) -> Result<Option<Message>, QueueError> {
        let visibility_timeout = visibility_timeout.max(Duration::zero());

        // Snapshot the entry list so the scan never holds the queue map open.
        // Pushes and deletes concurrent with the scan may or may not be
        // observed; every candidate is re-validated before use.
        let entries = match self.queues.get(queue) {
            Some(entries) => entries.value().clone(),
            None => return Ok(None),
        };

        for entry in &entries {
            // The lease mutex guards the deadline, so the visibility check
            // happens under the lock. A held lock means another caller is
            // mid-transition on this entry; skip it rather than wait.
            let Some(mut deadline) = entry.lease.try_lock() else {
                continue;
            };
            if *deadline > Timestamp::now() {
                continue;
            }
            if !self.is_live(queue, entry) {
                continue;
            }

            *deadline = Timestamp::from_datetime(Utc::now() + visibility_timeout);
            info!(queue = %queue, receipt_handle = %entry.receipt_handle, "message leased");
            return Ok(Some(Message::new(
                entry.body.clone(),
                entry.receipt_handle.clone(),
            )));
        }

        Ok(None)
    }

    async fn delete(
        &self,
        queue: &QueueName,
        receipt_handle: &ReceiptHandle,
    ) -> Result<(), QueueError> {
        if let Some(mut entries) = self.queues.get_mut(queue) {
            entries.retain(|entry| entry.receipt_handle != *receipt_handle);
        }
        debug!(queue = %queue, receipt_handle = %receipt_handle, "message deleted");
        Ok(())
    }
}
