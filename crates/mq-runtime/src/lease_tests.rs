//! Tests for lease locks.

use super::*;
use std::io::ErrorKind;

#[test]
fn test_registry_register_and_remove() {
    let registry = LeaseRegistry::new();
    let handle = ReceiptHandle::generate();

    assert!(!registry.contains(&handle));
    registry.register(&handle);
    assert!(registry.contains(&handle));
    registry.remove(&handle);
    assert!(!registry.contains(&handle));
}

#[test]
fn test_registry_returns_one_lock_per_handle() {
    let registry = LeaseRegistry::new();
    let handle = ReceiptHandle::generate();
    registry.register(&handle);

    let first = registry.lock_for(&handle);
    let second = registry.lock_for(&handle);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_registry_registers_unknown_handles_on_demand() {
    // Handles discovered on disk by a scan (pushed by another process) must
    // still get exactly one in-process lock.
    let registry = LeaseRegistry::new();
    let handle = ReceiptHandle::generate();

    let lock = registry.lock_for(&handle);
    assert!(registry.contains(&handle));
    assert!(Arc::ptr_eq(&lock, &registry.lock_for(&handle)));
}

#[test]
fn test_lock_contention_is_non_blocking() {
    let registry = LeaseRegistry::new();
    let handle = ReceiptHandle::generate();
    let lock = registry.lock_for(&handle);

    let guard = lock.try_lock();
    assert!(guard.is_some());
    // A second caller must fail immediately rather than wait.
    assert!(registry.lock_for(&handle).try_lock().is_none());

    drop(guard);
    assert!(registry.lock_for(&handle).try_lock().is_some());
}

#[test]
fn test_file_lock_exclusive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("0.message.txt");
    std::fs::write(&path, b"body").unwrap();

    let guard = try_lock_message_file(&path).unwrap();
    assert!(guard.is_some());

    // flock conflicts are per open file description, so a second open in the
    // same process observes the contention too.
    let contended = try_lock_message_file(&path).unwrap();
    assert!(contended.is_none());

    drop(guard);
    let reacquired = try_lock_message_file(&path).unwrap();
    assert!(reacquired.is_some());
}

#[test]
fn test_file_lock_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vanished.txt");

    let result = try_lock_message_file(&path);
    assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
}
