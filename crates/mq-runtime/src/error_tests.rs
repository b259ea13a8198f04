//! Tests for error types.

use super::*;

#[test]
fn test_storage_fault_display() {
    let error = QueueError::storage_fault(
        "write message file",
        Path::new("/tmp/queues/orders/0.abc.txt"),
        io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    );

    let rendered = error.to_string();
    assert!(rendered.contains("write message file"));
    assert!(rendered.contains("/tmp/queues/orders/0.abc.txt"));
    assert!(rendered.contains("denied"));
}

#[test]
fn test_validation_error_conversion() {
    let validation = ValidationError::Required {
        field: "receipt_handle".to_string(),
    };

    let error: QueueError = validation.into();
    assert!(matches!(error, QueueError::ValidationError(_)));
    assert!(error.to_string().contains("receipt_handle"));
}

#[test]
fn test_validation_error_display() {
    let error = ValidationError::InvalidFormat {
        field: "queue_name".to_string(),
        message: "only ASCII alphanumeric, hyphens, and underscores allowed".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "Invalid format for queue_name: only ASCII alphanumeric, hyphens, and underscores allowed"
    );
}
