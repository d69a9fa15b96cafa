//! Port abstraction for per-user support threads.
use async_trait::async_trait;

use crate::domain::{SupportThread, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by support thread adapters.
    pub enum SupportThreadPersistenceError {
        /// Query or mutation failed during execution.
        Query { message: String } => "support thread repository query failed: {message}",
    }
}

#[async_trait]
pub trait SupportThreadRepository: Send + Sync {
    /// Run `apply` against the user's thread, creating an empty thread first
    /// if none exists.
    async fn upsert_with<T, F>(
        &self,
        user_id: &UserId,
        apply: F,
    ) -> Result<T, SupportThreadPersistenceError>
    where
        T: Send,
        F: FnOnce(&mut SupportThread) -> T + Send;

    /// Run `apply` against an existing thread; `None` if the user has none.
    async fn update_existing<T, F>(
        &self,
        user_id: &UserId,
        apply: F,
    ) -> Result<Option<T>, SupportThreadPersistenceError>
    where
        T: Send,
        F: FnOnce(&mut SupportThread) -> T + Send;

    /// Snapshot of every thread.
    async fn list(&self) -> Result<Vec<SupportThread>, SupportThreadPersistenceError>;
}
