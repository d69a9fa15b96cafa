//! Port for delivering email verification codes.
//!
//! Production wiring logs the code; a mail adapter can replace it without
//! touching the account service.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::{UserId, VerificationCode};

use super::define_port_error;

define_port_error! {
    /// Errors raised while handing a code to the delivery channel.
    pub enum VerificationNotifierError {
        /// The channel rejected or failed to accept the code.
        Delivery { message: String } => "verification code delivery failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerificationNotifier: Send + Sync {
    /// Deliver `code` to `email`.
    async fn send_code(
        &self,
        email: &UserId,
        code: &VerificationCode,
    ) -> Result<(), VerificationNotifierError>;
}

/// Fixture notifier that remembers the latest code per address.
///
/// Lets flows that span signup and verification read the code back.
#[derive(Debug, Default)]
pub struct RecordingVerificationNotifier {
    sent: Mutex<HashMap<UserId, VerificationCode>>,
}

impl RecordingVerificationNotifier {
    /// Most recent code sent to `email`.
    pub fn last_code(&self, email: &UserId) -> Option<VerificationCode> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(email)
            .cloned()
    }
}

#[async_trait]
impl VerificationNotifier for RecordingVerificationNotifier {
    async fn send_code(
        &self,
        email: &UserId,
        code: &VerificationCode,
    ) -> Result<(), VerificationNotifierError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(email.clone(), code.clone());
        Ok(())
    }
}
