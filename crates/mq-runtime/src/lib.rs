//! # MQ Runtime
//!
//! Local emulation of a managed message-queue service (push/pull/delete with
//! visibility-timeout-based at-least-once delivery) for development and
//! testing, with two interchangeable backends:
//!
//! - an in-memory backend (non-durable, process-local);
//! - a file-system backend (durable across restarts, shareable between
//!   independent processes through a common storage root).
//!
//! The heart of the crate is the visibility-lease protocol: many concurrent
//! callers compete for the same pool of messages without ever blocking each
//! other, using non-blocking per-message locks plus deadlines that derive
//! visibility from the clock. A pull either wins one message and hides it for
//! the requested timeout, or reports that nothing is eligible right now;
//! callers wanting to wait poll with their own retry and cancellation policy.
//!
//! Delivery is at-least-once: a leased message that is never deleted becomes
//! visible again when its lease expires. No ordering across messages is
//! guaranteed. Exactly-once delivery, dead-letter handling, and size limits
//! are out of scope.
//!
//! ## Module Organization
//!
//! - [`error`] - Error types for all queue operations
//! - [`message`] - Message structure and domain identifiers
//! - [`lease`] - Non-blocking lease locks (in-process and OS advisory)
//! - [`service`] - The `QueueService` trait, configuration, and factory
//! - [`backends`] - In-memory and file-system backend implementations

// Module declarations
pub mod backends;
pub mod error;
pub mod lease;
pub mod message;
pub mod service;

// Re-export commonly used types at crate root for convenience
pub use backends::{FileBackend, InMemoryBackend};
pub use error::{QueueError, ValidationError};
pub use message::{Message, QueueName, ReceiptHandle, Timestamp};
pub use service::{BackendConfig, FileStoreConfig, QueueService, QueueServiceFactory};
