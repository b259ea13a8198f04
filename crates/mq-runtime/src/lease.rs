//! Non-blocking lease locks.
//!
//! The leasing protocol needs a single capability: "try to acquire an
//! exclusive lock without blocking, and report held/not-held". It is composed
//! at two levels:
//!
//! - an in-process lock per live message, held in a process-wide registry
//!   keyed by receipt handle (OS advisory locks commonly do not distinguish
//!   threads of the same process, so this level is mandatory on its own);
//! - for the file-system backend, an OS advisory lock on the message file,
//!   which extends exclusion to other processes sharing the storage root.
//!
//! Locks are released in reverse acquisition order, which in practice is the
//! natural drop order of the guards.

use crate::message::ReceiptHandle;
use dashmap::DashMap;
use fs2::FileExt;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Process-wide side-table mapping receipt handle to the in-process lock for
/// that message.
///
/// Entries are created at push time and removed at delete time so the table
/// cannot grow without bound. Handles discovered on disk that have no entry
/// yet (messages pushed by another process, or by this process before a
/// restart) get one registered on demand; the `DashMap` entry API makes that
/// registration race-free, so there is still exactly one lock object per
/// handle within the process.
#[derive(Debug, Default)]
pub struct LeaseRegistry {
    locks: DashMap<ReceiptHandle, Arc<Mutex<()>>>,
}

impl LeaseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lock for a freshly pushed message
    pub fn register(&self, handle: &ReceiptHandle) {
        self.locks.entry(handle.clone()).or_default();
    }

    /// Get the lock for a handle, registering one if the handle was first
    /// seen during a scan
    pub fn lock_for(&self, handle: &ReceiptHandle) -> Arc<Mutex<()>> {
        self.locks.entry(handle.clone()).or_default().clone()
    }

    /// Drop the lock entry for a deleted message
    pub fn remove(&self, handle: &ReceiptHandle) {
        self.locks.remove(handle);
    }

    /// Whether a handle currently has a registered lock
    pub fn contains(&self, handle: &ReceiptHandle) -> bool {
        self.locks.contains_key(handle)
    }
}

/// Guard for an OS advisory lock on a message file. The lock is released on
/// drop.
#[derive(Debug)]
pub struct FileLockGuard {
    file: File,
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        // Closing the file would release the lock anyway; the explicit unlock
        // keeps the release point deterministic.
        let _ = self.file.unlock();
    }
}

/// Try to take an exclusive, non-blocking advisory lock on a message file.
///
/// Returns `Ok(None)` when another process already holds the lock. A missing
/// file surfaces as `Err` with `NotFound` so callers can treat a candidate
/// renamed out from under them as a skip rather than a fault.
pub fn try_lock_message_file(path: &Path) -> io::Result<Option<FileLockGuard>> {
    let file = OpenOptions::new().write(true).open(path)?;
    match file.try_lock_exclusive() {
        Ok(()) => Ok(Some(FileLockGuard { file })),
        Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "lease_tests.rs"]
mod tests;
