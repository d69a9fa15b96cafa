//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// A user with the same identifier is already stored.
        Duplicate { id: String } => "user {id} already exists",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Roster facts observed under the same critical section as an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterSnapshot {
    /// Number of users currently holding the `admin` role.
    pub admin_count: usize,
}

/// A deleted user together with the records removed alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedUser {
    pub user: User,
    /// Department messages authored by the user.
    pub department_messages: usize,
    /// Whether the user's support thread existed and was removed.
    pub support_thread: bool,
}

/// Identity store.
///
/// Every method is atomic with respect to the other user, message and
/// thread ports backed by the same adapter.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; fails with [`UserPersistenceError::Duplicate`] if
    /// the id is taken.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// All users in stable (identifier) order.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Read-modify-write a single user.
    ///
    /// `apply` runs against a copy of the stored record; the copy replaces the
    /// record only when `apply` returns `Ok`. Returns `None` when the user
    /// does not exist.
    async fn update<T, F>(
        &self,
        id: &UserId,
        apply: F,
    ) -> Result<Option<Result<T, Error>>, UserPersistenceError>
    where
        T: Send,
        F: FnOnce(&mut User, RosterSnapshot) -> Result<T, Error> + Send;

    /// Remove a user, their department messages and their support thread.
    async fn remove(&self, id: &UserId) -> Result<Option<RemovedUser>, UserPersistenceError>;
}
