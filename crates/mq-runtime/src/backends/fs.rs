//! File-system queue backend.
//!
//! Durable across process restarts, and shareable between independent
//! processes through a common storage root. Layout: one subdirectory per
//! queue, one file per message named
//! `"<deadlineEpochMillis>.<receiptHandle>.txt"` with the raw body bytes as
//! content. A lease transition renames the file to a name encoding the new
//! deadline; the rename is atomic and also changes the on-disk identity used
//! by the existence re-check. Directory enumeration order carries no meaning.
//!
//! Mutual exclusion is layered: the in-process [`LeaseRegistry`] lock first
//! (OS advisory locks commonly do not distinguish threads of one process),
//! then a non-blocking advisory lock on the message file for cross-process
//! exclusion. Either lock being held, or the candidate vanishing, just skips
//! that candidate.

use crate::error::QueueError;
use crate::lease::{self, LeaseRegistry};
use crate::message::{Message, QueueName, ReceiptHandle, Timestamp};
use crate::service::{FileStoreConfig, QueueService};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[cfg(test)]
#[path = "fs_tests.rs"]
mod tests;

const MESSAGE_FILE_EXTENSION: &str = "txt";

/// File-system implementation of [`QueueService`]
#[derive(Debug)]
pub struct FileBackend {
    root: PathBuf,
    registry: LeaseRegistry,
}

impl FileBackend {
    /// Create a backend over the given storage root, creating the root
    /// directory if needed
    pub fn new(config: FileStoreConfig) -> Result<Self, QueueError> {
        fs::create_dir_all(&config.root)
            .map_err(|e| QueueError::storage_fault("create storage root", &config.root, e))?;
        Ok(Self {
            root: config.root,
            registry: LeaseRegistry::new(),
        })
    }

    fn queue_dir(&self, queue: &QueueName) -> PathBuf {
        self.root.join(queue.as_str())
    }
}

/// Encode a message filename from its lease deadline and receipt handle
fn message_file_name(deadline_millis: i64, handle: &ReceiptHandle) -> String {
    format!("{}.{}.{}", deadline_millis, handle, MESSAGE_FILE_EXTENSION)
}

/// Decode a filename back into `(deadline, handle)`. Files that do not match
/// the naming scheme are not messages and get ignored by scans.
fn parse_file_name(name: &str) -> Option<(Timestamp, ReceiptHandle)> {
    let mut parts = name.splitn(3, '.');
    let millis: i64 = parts.next()?.parse().ok()?;
    let handle: ReceiptHandle = parts.next()?.parse().ok()?;
    if parts.next() != Some(MESSAGE_FILE_EXTENSION) {
        return None;
    }
    let deadline = Timestamp::from_epoch_millis(millis)?;
    Some((deadline, handle))
}

#[async_trait]
impl QueueService for FileBackend {
    async fn push(&self, queue: &QueueName, body: Bytes) -> Result<(), QueueError> {
        let queue_dir = self.queue_dir(queue);
        fs::create_dir_all(&queue_dir)
            .map_err(|e| QueueError::storage_fault("create queue directory", &queue_dir, e))?;

        let receipt_handle = ReceiptHandle::generate();
        // Deadline 0 (the epoch) is long past, so the message is visible
        // right away.
        let path = queue_dir.join(message_file_name(0, &receipt_handle));
        fs::write(&path, &body)
            .map_err(|e| QueueError::storage_fault("write message file", &path, e))?;

        self.registry.register(&receipt_handle);
        debug!(queue = %queue, receipt_handle = %receipt_handle, "message pushed");
        Ok(())
    }

    async fn pull(
        &self,
        queue: &QueueName,
        visibility_timeout: Duration,
    ) -> Result<Option<Message>, QueueError> {
        let visibility_timeout = visibility_timeout.max(Duration::zero());
        let queue_dir = self.queue_dir(queue);

        // Snapshot the directory listing. A queue nobody ever pushed to has
        // no directory and no messages.
        let entries = match fs::read_dir(&queue_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(QueueError::storage_fault("list queue directory", &queue_dir, e)),
        };
        let paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();

        for path in &paths {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some((deadline, receipt_handle)) = parse_file_name(name) else {
                continue;
            };
            if deadline > Timestamp::now() {
                continue;
            }

            // In-process lock first. The registry registers locks on demand
            // for handles pushed by other processes sharing this root.
            let lock = self.registry.lock_for(&receipt_handle);
            let Some(_lease) = lock.try_lock() else {
                continue;
            };

            // Then the advisory file lock for cross-process exclusion.
            let _file_lock = match lease::try_lock_message_file(path) {
                Ok(Some(guard)) => guard,
                // Held by another process.
                Ok(None) => continue,
                // Renamed or deleted between snapshot and open.
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping candidate: lock failed");
                    continue;
                }
            };

            // Another process may have renamed the file between our open and
            // our lock; its lease transition changed the on-disk name, so the
            // snapshot path no longer exists.
            if !path.exists() {
                continue;
            }

            // The rename is the atomic lease transition: new name, new
            // deadline, same handle.
            let new_deadline = Timestamp::from_datetime(Utc::now() + visibility_timeout);
            let new_path =
                queue_dir.join(message_file_name(new_deadline.epoch_millis(), &receipt_handle));
            if let Err(e) = fs::rename(path, &new_path) {
                warn!(path = %path.display(), error = %e, "skipping candidate: rename failed");
                continue;
            }

            let body = match fs::read(&new_path) {
                Ok(body) => body,
                Err(e) => {
                    // The lease transition already happened; the message
                    // resurfaces once this visibility window expires.
                    warn!(path = %new_path.display(), error = %e, "skipping candidate: read failed");
                    continue;
                }
            };

            info!(queue = %queue, receipt_handle = %receipt_handle, "message leased");
            return Ok(Some(Message::new(Bytes::from(body), receipt_handle)));
        }

        Ok(None)
    }

    async fn delete(
        &self,
        queue: &QueueName,
        receipt_handle: &ReceiptHandle,
    ) -> Result<(), QueueError> {
        let queue_dir = self.queue_dir(queue);
        match fs::read_dir(&queue_dir) {
            Ok(entries) => {
                // The filename changes with every lease, so the message is
                // located by its handle component.
                for entry in entries.filter_map(Result::ok) {
                    let path = entry.path();
                    let matches = path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .and_then(parse_file_name)
                        .is_some_and(|(_, handle)| handle == *receipt_handle);
                    if !matches {
                        continue;
                    }
                    match fs::remove_file(&path) {
                        Ok(()) => {}
                        // Another caller deleted it first; still a no-op.
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                        Err(e) => {
                            return Err(QueueError::storage_fault("delete message file", &path, e))
                        }
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(QueueError::storage_fault("list queue directory", &queue_dir, e))
            }
        }

        self.registry.remove(receipt_handle);
        debug!(queue = %queue, receipt_handle = %receipt_handle, "message deleted");
        Ok(())
    }
}
