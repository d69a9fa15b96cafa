//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-wide in-memory store behind a single mutex
//! - **hashing**: Argon2id credential hashing
//! - **notifier**: log-based delivery of verification codes
//!
//! Adapters are thin translators that contain no business logic.

pub mod hashing;
pub mod memory;
pub mod notifier;
