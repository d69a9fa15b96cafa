//! Port abstraction for signups awaiting email verification.
use async_trait::async_trait;

use crate::domain::{PendingVerification, Redemption, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by pending verification adapters.
    pub enum PendingVerificationPersistenceError {
        /// Query or mutation failed during execution.
        Query { message: String } => "pending verification repository query failed: {message}",
    }
}

#[async_trait]
pub trait PendingVerificationRepository: Send + Sync {
    /// Store a pending signup, replacing any earlier one for the same email.
    async fn put(
        &self,
        pending: PendingVerification,
    ) -> Result<(), PendingVerificationPersistenceError>;

    /// Decide the fate of the pending record for `email` atomically.
    ///
    /// The record is removed when the decision
    /// [removes it](Redemption::removes_record). Returns the decision and
    /// the record, or `None` if nothing is pending.
    async fn redeem<F>(
        &self,
        email: &UserId,
        decide: F,
    ) -> Result<Option<(Redemption, PendingVerification)>, PendingVerificationPersistenceError>
    where
        F: FnOnce(&PendingVerification) -> Redemption + Send;
}
